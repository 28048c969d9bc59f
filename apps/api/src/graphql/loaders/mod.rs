//! Batched loaders for GraphQL relationship fields
//!
//! This module provides the request-scoped [`BatchLoader`] and the loaders
//! that back relationship resolvers. Each loader batches many single-key
//! requests into one store call.
//!
//! There are two types of loaders:
//! - Single-entity loaders: `Option<T>` for a single entity by id
//! - Collection loaders: `Vec<T>` of related entities by parent id
//!
//! A fresh [`Loaders`] bundle is built for every GraphQL request so cached
//! values never outlive the request that loaded them.

mod author;
mod batch;
mod book;
mod books_by_author;

pub use author::AuthorLoader;
pub use batch::{
    BatchLoader, Loader, LoaderSettings, DEFAULT_BATCH_DELAY, DEFAULT_MAX_BATCH_SIZE,
};
pub use book::BookLoader;
pub use books_by_author::BooksByAuthorLoader;

use crate::repositories::SharedStore;

/// Per-request container for all loader instances
#[derive(Clone)]
pub struct Loaders {
    pub author: BatchLoader<i32, AuthorLoader>,
    pub book: BatchLoader<i32, BookLoader>,
    pub books_by_author: BatchLoader<i32, BooksByAuthorLoader>,
}

impl Loaders {
    /// Build a fresh set of loaders over `store`
    pub fn new(store: SharedStore, settings: LoaderSettings) -> Self {
        Self {
            author: BatchLoader::with_settings(AuthorLoader::new(store.clone()), settings),
            book: BatchLoader::with_settings(BookLoader::new(store.clone()), settings),
            books_by_author: BatchLoader::with_settings(BooksByAuthorLoader::new(store), settings),
        }
    }

    /// Drop every cached value, e.g. after a mutation changed the store
    pub fn clear_all(&self) {
        self.author.clear();
        self.book.clear();
        self.books_by_author.clear();
    }
}
