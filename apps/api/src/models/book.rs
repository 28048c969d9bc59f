//! Book model for Bookshelf
//!
//! Books reference exactly one author and carry an ordered list of category
//! tags. Publication dates are calendar dates rendered as `YYYY-MM-DD`.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Wire format of publication dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Book record from the books table
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Book {
    /// Unique book identifier, assigned by the store
    pub id: i32,

    /// Book title, also used as the lookup key of title-based mutations
    pub title: String,

    /// Author who wrote this book
    pub author_id: i32,

    /// Publication date
    pub publication_date: NaiveDate,

    /// Category tags, in display order
    pub categories: Vec<String>,
}

impl Book {
    /// Exact, case-sensitive category membership
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    /// Publication date in wire format
    pub fn publication_date_string(&self) -> String {
        self.publication_date.format(DATE_FORMAT).to_string()
    }
}

/// Book creation input
#[derive(Debug, Clone, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author_id: i32,
    pub publication_date: NaiveDate,
    pub categories: Vec<String>,
}

/// Partial update of a book
///
/// `None` leaves the field untouched. `Some` replaces it, including with an
/// empty category list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub publication_date: Option<NaiveDate>,
    pub categories: Option<Vec<String>>,
}

impl BookPatch {
    /// True when applying the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.publication_date.is_none() && self.categories.is_none()
    }

    /// Apply the present fields to `book`
    pub fn apply(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(date) = self.publication_date {
            book.publication_date = date;
        }
        if let Some(categories) = &self.categories {
            book.categories = categories.clone();
        }
    }
}

/// Publication date ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    /// Interpret the `order` argument of `booksSortedByDate`.
    ///
    /// Only the exact string `ASC` selects ascending order; anything else is
    /// descending.
    pub fn from_arg(order: &str) -> Self {
        if order == "ASC" {
            Self::Asc
        } else {
            Self::Desc
        }
    }

    /// SQL keyword for ORDER BY clauses
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Compare two books by publication date in this order, ties by id ascending
    pub fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let by_date = match self {
            Self::Asc => a.publication_date.cmp(&b.publication_date),
            Self::Desc => b.publication_date.cmp(&a.publication_date),
        };
        by_date.then(a.id.cmp(&b.id))
    }
}

/// Parse a `YYYY-MM-DD` publication date
pub fn parse_publication_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}
