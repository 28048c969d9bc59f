//! Library queries for Bookshelf GraphQL API
//!
//! This module provides queries for browsing the library:
//! - Books: list, recent, by category, sorted by publication date
//! - Authors: list
//! - Point lookups of a single book or author

use async_graphql::{Context, Object, Result};

use crate::graphql::loaders::Loaders;
use crate::graphql::to_graphql_error;
use crate::graphql::types::{Author, Book};
use crate::models::SortOrder;
use crate::repositories::SharedStore;

/// Number of books returned by `recentBooks`
pub const RECENT_BOOKS_LIMIT: usize = 2;

/// Library queries for browsing books and authors
#[derive(Default)]
pub struct LibraryQuery;

#[Object]
impl LibraryQuery {
    // ==================== Book Queries ====================

    /// All books, in insertion order
    async fn books(&self, ctx: &Context<'_>) -> Result<Vec<Book>> {
        let store = ctx.data::<SharedStore>()?;
        let books = store.list_books().await.map_err(to_graphql_error)?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    /// The most recently published books, newest first
    async fn recent_books(&self, ctx: &Context<'_>) -> Result<Vec<Book>> {
        let store = ctx.data::<SharedStore>()?;
        let books = store
            .list_books_by_date(SortOrder::Desc, Some(RECENT_BOOKS_LIMIT))
            .await
            .map_err(to_graphql_error)?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    /// Books tagged with exactly `category` (case-sensitive)
    async fn books_by_category(&self, ctx: &Context<'_>, category: String) -> Result<Vec<Book>> {
        let store = ctx.data::<SharedStore>()?;
        let books = store
            .find_books_by_category(&category)
            .await
            .map_err(to_graphql_error)?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    /// All books sorted by publication date
    ///
    /// `"ASC"` sorts oldest first; any other value sorts newest first.
    async fn books_sorted_by_date(&self, ctx: &Context<'_>, order: String) -> Result<Vec<Book>> {
        let store = ctx.data::<SharedStore>()?;
        let books = store
            .list_books_by_date(SortOrder::from_arg(&order), None)
            .await
            .map_err(to_graphql_error)?;
        Ok(books.into_iter().map(Book::from).collect())
    }

    /// Get a book by id
    async fn book(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Book>> {
        let loaders = ctx.data::<Loaders>()?;
        let book = loaders.book.load_one(id).await.map_err(to_graphql_error)?;
        Ok(book.map(Book::from))
    }

    // ==================== Author Queries ====================

    /// All authors, in insertion order
    async fn authors(&self, ctx: &Context<'_>) -> Result<Vec<Author>> {
        let store = ctx.data::<SharedStore>()?;
        let authors = store.list_authors().await.map_err(to_graphql_error)?;
        Ok(authors.into_iter().map(Author::from).collect())
    }

    /// Get an author by id
    async fn author(&self, ctx: &Context<'_>, id: i32) -> Result<Option<Author>> {
        let loaders = ctx.data::<Loaders>()?;
        let author = loaders.author.load_one(id).await.map_err(to_graphql_error)?;
        Ok(author.map(Author::from))
    }
}
