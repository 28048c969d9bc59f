//! Author GraphQL type

use async_graphql::{Context, Object, Result};

use crate::graphql::loaders::Loaders;
use crate::graphql::to_graphql_error;
use crate::models::Author as DbAuthor;

use super::book::Book;

/// Author information exposed via GraphQL
pub struct Author {
    inner: DbAuthor,
}

impl Author {
    /// Create a new GraphQL Author from a stored Author
    pub fn new(author: DbAuthor) -> Self {
        Self { inner: author }
    }
}

impl From<DbAuthor> for Author {
    fn from(author: DbAuthor) -> Self {
        Self::new(author)
    }
}

#[Object]
impl Author {
    /// Unique author identifier
    async fn id(&self) -> i32 {
        self.inner.id
    }

    /// Author name
    async fn name(&self) -> &str {
        &self.inner.name
    }

    /// Books written by this author, in id order
    ///
    /// Requests for many authors are batched into a single store call.
    async fn books(&self, ctx: &Context<'_>) -> Result<Vec<Book>> {
        let loaders = ctx.data::<Loaders>()?;
        let books = loaders
            .books_by_author
            .load_one(self.inner.id)
            .await
            .map_err(to_graphql_error)?;

        Ok(books
            .unwrap_or_default()
            .into_iter()
            .map(Book::from)
            .collect())
    }
}
