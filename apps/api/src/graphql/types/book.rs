//! Book GraphQL type
//!
//! This module defines the GraphQL type for books with their author resolver.

use async_graphql::{Context, Object, Result};

use crate::error::ApiError;
use crate::graphql::loaders::Loaders;
use crate::graphql::to_graphql_error;
use crate::models::Book as DbBook;

use super::author::Author;

/// Book information exposed via GraphQL
pub struct Book {
    inner: DbBook,
}

impl Book {
    /// Create a new GraphQL Book from a stored Book
    pub fn new(book: DbBook) -> Self {
        Self { inner: book }
    }
}

impl From<DbBook> for Book {
    fn from(book: DbBook) -> Self {
        Self::new(book)
    }
}

#[Object]
impl Book {
    /// Unique book identifier
    async fn id(&self) -> i32 {
        self.inner.id
    }

    /// Book title
    async fn title(&self) -> &str {
        &self.inner.title
    }

    /// Publication date as `YYYY-MM-DD`
    async fn publication_date(&self) -> String {
        self.inner.publication_date_string()
    }

    /// Category tags
    async fn categories(&self) -> &[String] {
        &self.inner.categories
    }

    /// Author of this book (batched through the request's author loader)
    async fn author(&self, ctx: &Context<'_>) -> Result<Author> {
        let loaders = ctx.data::<Loaders>()?;
        let author_id = self.inner.author_id;
        loaders
            .author
            .load_one(author_id)
            .await
            .map_err(to_graphql_error)?
            .map(Author::from)
            .ok_or_else(|| to_graphql_error(ApiError::not_found("author", author_id.to_string())))
    }
}
