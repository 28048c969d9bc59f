//! Book loader for batched fetching

use std::collections::HashMap;
use std::sync::Arc;

use super::batch::Loader;
use crate::models::Book;
use crate::repositories::{SharedStore, StoreError};

/// Loader for books by id
#[derive(Clone)]
pub struct BookLoader {
    store: SharedStore,
}

impl BookLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<i32> for BookLoader {
    type Value = Book;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[i32]) -> Result<HashMap<i32, Self::Value>, Self::Error> {
        let books = self
            .store
            .find_books_by_ids(keys)
            .await
            .map_err(Arc::new)?;

        Ok(books.into_iter().map(|b| (b.id, b)).collect())
    }
}
