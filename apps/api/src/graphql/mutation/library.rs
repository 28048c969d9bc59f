//! Library mutations for Bookshelf GraphQL API
//!
//! This module provides mutations for library management:
//! - addBook: Create a book for an existing author
//! - addAuthor: Create an author
//! - updateBook: Partially update a book found by title
//! - deleteBook: Delete a book found by title
//! - deleteAuthor: Delete an author, subject to the author deletion policy
//!
//! Every successful mutation clears the request's loaders so later fields of
//! the same request observe the write.

use async_graphql::{Context, Object, Result};

use crate::graphql::loaders::Loaders;
use crate::graphql::to_graphql_error;
use crate::graphql::types::{Author, Book};
use crate::services::{AddBook, LibraryService, UpdateBook};

/// Drop cached loader values after a write
fn invalidate_loaders(ctx: &Context<'_>) {
    if let Some(loaders) = ctx.data_opt::<Loaders>() {
        loaders.clear_all();
    }
}

/// Library mutations for books and authors
#[derive(Default)]
pub struct LibraryMutation;

#[Object]
impl LibraryMutation {
    /// Create a new book
    ///
    /// Fails with NOT_FOUND when `authorId` does not reference an author; the
    /// store is left untouched in that case.
    async fn add_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        author_id: i32,
        publication_date: String,
        #[graphql(default)] categories: Vec<String>,
    ) -> Result<Book> {
        let service = ctx.data::<LibraryService>()?;
        let book = service
            .add_book(AddBook {
                title,
                author_id,
                publication_date,
                categories,
            })
            .await
            .map_err(to_graphql_error)?;

        invalidate_loaders(ctx);
        Ok(Book::from(book))
    }

    /// Create a new author
    async fn add_author(&self, ctx: &Context<'_>, name: String) -> Result<Author> {
        let service = ctx.data::<LibraryService>()?;
        let author = service.add_author(name).await.map_err(to_graphql_error)?;

        invalidate_loaders(ctx);
        Ok(Author::from(author))
    }

    /// Update the book holding `title`
    ///
    /// Omitted (or null) arguments leave the field unchanged. An empty
    /// `newCategories` list clears the categories.
    async fn update_book(
        &self,
        ctx: &Context<'_>,
        title: String,
        new_title: Option<String>,
        new_publication_date: Option<String>,
        new_categories: Option<Vec<String>>,
    ) -> Result<Book> {
        let service = ctx.data::<LibraryService>()?;
        let book = service
            .update_book(UpdateBook {
                title,
                new_title,
                new_publication_date,
                new_categories,
            })
            .await
            .map_err(to_graphql_error)?;

        invalidate_loaders(ctx);
        Ok(Book::from(book))
    }

    /// Delete the book holding `title` and return it
    async fn delete_book(&self, ctx: &Context<'_>, title: String) -> Result<Book> {
        let service = ctx.data::<LibraryService>()?;
        let book = service.delete_book(&title).await.map_err(to_graphql_error)?;

        invalidate_loaders(ctx);
        Ok(Book::from(book))
    }

    /// Delete an author and return it
    ///
    /// With the `restrict` policy an author who still has books cannot be
    /// deleted (CONFLICT). With `cascade` their books are deleted first.
    async fn delete_author(&self, ctx: &Context<'_>, id: i32) -> Result<Author> {
        let service = ctx.data::<LibraryService>()?;
        let author = service.delete_author(id).await.map_err(to_graphql_error)?;

        invalidate_loaders(ctx);
        Ok(Author::from(author))
    }
}
