//! Books-by-Author loader for batched fetching
//!
//! Batches author id lookups into a single store call returning every book
//! of every requested author. This solves the N+1 problem when resolving
//! `Author.books` for a list of authors.

use std::collections::HashMap;
use std::sync::Arc;

use super::batch::Loader;
use crate::models::Book;
use crate::repositories::{SharedStore, StoreError};

/// Loader for the books of an author, keyed by author id
#[derive(Clone)]
pub struct BooksByAuthorLoader {
    store: SharedStore,
}

impl BooksByAuthorLoader {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

impl Loader<i32> for BooksByAuthorLoader {
    type Value = Vec<Book>;
    type Error = Arc<StoreError>;

    async fn load(&self, keys: &[i32]) -> Result<HashMap<i32, Self::Value>, Self::Error> {
        let books = self
            .store
            .find_books_by_author_ids(keys)
            .await
            .map_err(Arc::new)?;

        // Group books by author_id
        let mut result: HashMap<i32, Vec<Book>> = HashMap::new();
        for book in books {
            result.entry(book.author_id).or_default().push(book);
        }

        // Ensure all requested keys have an entry (even if empty)
        for key in keys {
            result.entry(*key).or_default();
        }

        Ok(result)
    }
}
