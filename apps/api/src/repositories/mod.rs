//! Entity store layer for Bookshelf
//!
//! All book and author persistence goes through the [`EntityStore`] trait so
//! resolvers and loaders stay independent of the backend:
//! - [`MemoryStore`]: process-local vectors behind a tokio `RwLock`
//! - [`PgStore`]: PostgreSQL through a `sqlx` connection pool
//!
//! Stores only persist. Preconditions such as "the author must exist" and the
//! title/deletion policies are enforced by `LibraryService`.

pub mod memory;
pub mod postgres;
pub mod utils;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Author, Book, BookPatch, NewAuthor, NewBook, SortOrder};

/// Errors raised by entity store implementations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Query against the database failed
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store cannot serve requests right now
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness constraint of the store rejected the write
    #[error("{resource_type} already exists: {key}")]
    Conflict {
        resource_type: &'static str,
        key: String,
    },
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store handle shared by every request
pub type SharedStore = Arc<dyn EntityStore>;

/// Keyed and filtered CRUD over authors and books
///
/// Multi-key lookups return the rows that exist in no particular order;
/// callers map them back by id.
#[async_trait]
pub trait EntityStore: Send + Sync + 'static {
    /// Cheap round-trip used by readiness checks
    async fn ping(&self) -> StoreResult<()>;

    // ==================== Authors ====================

    /// Find an author by id
    async fn find_author(&self, id: i32) -> StoreResult<Option<Author>>;

    /// Find every author whose id is in `ids`
    async fn find_authors_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Author>>;

    /// Find an author by exact name
    async fn find_author_by_name(&self, name: &str) -> StoreResult<Option<Author>>;

    /// All authors in id order
    async fn list_authors(&self) -> StoreResult<Vec<Author>>;

    /// Insert an author; duplicate names fail with [`StoreError::Conflict`]
    async fn create_author(&self, author: NewAuthor) -> StoreResult<Author>;

    /// Delete an author, and first its books when `cascade` is set.
    ///
    /// Returns `false` when no author has this id.
    async fn delete_author(&self, id: i32, cascade: bool) -> StoreResult<bool>;

    // ==================== Books ====================

    /// Find every book whose id is in `ids`
    async fn find_books_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Book>>;

    /// Find every book written by one of `author_ids`, in id order
    async fn find_books_by_author_ids(&self, author_ids: &[i32]) -> StoreResult<Vec<Book>>;

    /// Lowest-id book carrying exactly this title
    async fn find_book_by_title(&self, title: &str) -> StoreResult<Option<Book>>;

    /// All books in id (insertion) order
    async fn list_books(&self) -> StoreResult<Vec<Book>>;

    /// Books tagged with exactly `category` (case-sensitive), in id order
    async fn find_books_by_category(&self, category: &str) -> StoreResult<Vec<Book>>;

    /// Books ordered by publication date, ties by id, optionally truncated
    async fn list_books_by_date(
        &self,
        order: SortOrder,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Book>>;

    /// Insert a book
    async fn create_book(&self, book: NewBook) -> StoreResult<Book>;

    /// Apply a partial update; `None` when no book has this id
    async fn update_book(&self, id: i32, patch: BookPatch) -> StoreResult<Option<Book>>;

    /// Delete a book; `None` when no book has this id
    async fn delete_book(&self, id: i32) -> StoreResult<Option<Book>>;
}
