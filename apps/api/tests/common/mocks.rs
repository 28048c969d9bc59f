//! Instrumented entity stores for API integration tests
//!
//! [`CountingStore`] wraps a [`MemoryStore`] and records the keys of every
//! multi-key lookup so tests can observe how loaders batch. [`DownStore`]
//! fails every call, standing in for an unreachable database.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use bookshelf_api::models::{Author, Book, BookPatch, NewAuthor, NewBook, SortOrder};
use bookshelf_api::repositories::{EntityStore, MemoryStore, StoreError, StoreResult};

/// Memory store that records multi-key lookups
#[derive(Default)]
pub struct CountingStore {
    inner: MemoryStore,
    author_batches: Mutex<Vec<Vec<i32>>>,
    book_batches: Mutex<Vec<Vec<i32>>>,
    books_by_author_batches: Mutex<Vec<Vec<i32>>>,
    fail_author_batches: AtomicBool,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys of every `find_authors_by_ids` call, in call order
    pub fn author_batches(&self) -> Vec<Vec<i32>> {
        self.author_batches.lock().unwrap().clone()
    }

    /// Keys of every `find_books_by_ids` call, in call order
    pub fn book_batches(&self) -> Vec<Vec<i32>> {
        self.book_batches.lock().unwrap().clone()
    }

    /// Keys of every `find_books_by_author_ids` call, in call order
    pub fn books_by_author_batches(&self) -> Vec<Vec<i32>> {
        self.books_by_author_batches.lock().unwrap().clone()
    }

    /// Make `find_authors_by_ids` fail (calls are still recorded)
    pub fn fail_author_batches(&self, fail: bool) {
        self.fail_author_batches.store(fail, Ordering::SeqCst);
    }

    /// Forget recorded calls
    pub fn reset(&self) {
        self.author_batches.lock().unwrap().clear();
        self.book_batches.lock().unwrap().clear();
        self.books_by_author_batches.lock().unwrap().clear();
    }
}

#[async_trait]
impl EntityStore for CountingStore {
    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }

    async fn find_author(&self, id: i32) -> StoreResult<Option<Author>> {
        self.inner.find_author(id).await
    }

    async fn find_authors_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Author>> {
        self.author_batches.lock().unwrap().push(ids.to_vec());
        if self.fail_author_batches.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("author lookups disabled".to_string()));
        }
        self.inner.find_authors_by_ids(ids).await
    }

    async fn find_author_by_name(&self, name: &str) -> StoreResult<Option<Author>> {
        self.inner.find_author_by_name(name).await
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        self.inner.list_authors().await
    }

    async fn create_author(&self, author: NewAuthor) -> StoreResult<Author> {
        self.inner.create_author(author).await
    }

    async fn delete_author(&self, id: i32, cascade: bool) -> StoreResult<bool> {
        self.inner.delete_author(id, cascade).await
    }

    async fn find_books_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Book>> {
        self.book_batches.lock().unwrap().push(ids.to_vec());
        self.inner.find_books_by_ids(ids).await
    }

    async fn find_books_by_author_ids(&self, author_ids: &[i32]) -> StoreResult<Vec<Book>> {
        self.books_by_author_batches
            .lock()
            .unwrap()
            .push(author_ids.to_vec());
        self.inner.find_books_by_author_ids(author_ids).await
    }

    async fn find_book_by_title(&self, title: &str) -> StoreResult<Option<Book>> {
        self.inner.find_book_by_title(title).await
    }

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        self.inner.list_books().await
    }

    async fn find_books_by_category(&self, category: &str) -> StoreResult<Vec<Book>> {
        self.inner.find_books_by_category(category).await
    }

    async fn list_books_by_date(
        &self,
        order: SortOrder,
        limit: Option<usize>,
    ) -> StoreResult<Vec<Book>> {
        self.inner.list_books_by_date(order, limit).await
    }

    async fn create_book(&self, book: NewBook) -> StoreResult<Book> {
        self.inner.create_book(book).await
    }

    async fn update_book(&self, id: i32, patch: BookPatch) -> StoreResult<Option<Book>> {
        self.inner.update_book(id, patch).await
    }

    async fn delete_book(&self, id: i32) -> StoreResult<Option<Book>> {
        self.inner.delete_book(id).await
    }
}

/// Store whose every call fails as unavailable
pub struct DownStore;

fn down<T>() -> StoreResult<T> {
    Err(StoreError::Unavailable("connection refused".to_string()))
}

#[async_trait]
impl EntityStore for DownStore {
    async fn ping(&self) -> StoreResult<()> {
        down()
    }

    async fn find_author(&self, _id: i32) -> StoreResult<Option<Author>> {
        down()
    }

    async fn find_authors_by_ids(&self, _ids: &[i32]) -> StoreResult<Vec<Author>> {
        down()
    }

    async fn find_author_by_name(&self, _name: &str) -> StoreResult<Option<Author>> {
        down()
    }

    async fn list_authors(&self) -> StoreResult<Vec<Author>> {
        down()
    }

    async fn create_author(&self, _author: NewAuthor) -> StoreResult<Author> {
        down()
    }

    async fn delete_author(&self, _id: i32, _cascade: bool) -> StoreResult<bool> {
        down()
    }

    async fn find_books_by_ids(&self, _ids: &[i32]) -> StoreResult<Vec<Book>> {
        down()
    }

    async fn find_books_by_author_ids(&self, _author_ids: &[i32]) -> StoreResult<Vec<Book>> {
        down()
    }

    async fn find_book_by_title(&self, _title: &str) -> StoreResult<Option<Book>> {
        down()
    }

    async fn list_books(&self) -> StoreResult<Vec<Book>> {
        down()
    }

    async fn find_books_by_category(&self, _category: &str) -> StoreResult<Vec<Book>> {
        down()
    }

    async fn list_books_by_date(
        &self,
        _order: SortOrder,
        _limit: Option<usize>,
    ) -> StoreResult<Vec<Book>> {
        down()
    }

    async fn create_book(&self, _book: NewBook) -> StoreResult<Book> {
        down()
    }

    async fn update_book(&self, _id: i32, _patch: BookPatch) -> StoreResult<Option<Book>> {
        down()
    }

    async fn delete_book(&self, _id: i32) -> StoreResult<Option<Book>> {
        down()
    }
}
