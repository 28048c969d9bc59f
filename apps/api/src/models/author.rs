//! Author model for Bookshelf

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Author record from the authors table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Author {
    /// Unique author identifier, assigned by the store
    pub id: i32,

    /// Author name, unique across authors
    pub name: String,
}

/// Author creation input
#[derive(Debug, Clone, Deserialize)]
pub struct NewAuthor {
    pub name: String,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_serialization() {
        let author = Author {
            id: 4,
            name: "George Orwell".to_string(),
        };

        let json = serde_json::to_value(&author).expect("serialization should succeed");
        assert_eq!(json["id"], 4);
        assert_eq!(json["name"], "George Orwell");
    }
}
