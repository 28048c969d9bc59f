//! Author loader for batched fetching
//!
//! Batches author id lookups into a single store call, solving the N+1
//! problem when resolving `Book.author` for a list of books.

use std::collections::HashMap;
use std::sync::Arc;

use super::batch::Loader;
use crate::models::Author;
use crate::repositories::{SharedStore, StoreError};

/// Loader for authors by id
#[derive(Clone)]
pub struct AuthorLoader {
    store: SharedStore,
}

impl AuthorLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<i32> for AuthorLoader {
    type Value = Author;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[i32]) -> Result<HashMap<i32, Self::Value>, Self::Error> {
        let authors = self
            .store
            .find_authors_by_ids(keys)
            .await
            .map_err(Arc::new)?;

        Ok(authors.into_iter().map(|a| (a.id, a)).collect())
    }
}
