//! GraphQL schema and resolvers for Bookshelf
//!
//! This module contains the async-graphql schema including:
//! - Query resolvers for books and authors
//! - Mutation resolvers for library changes
//! - Type definitions for all GraphQL objects
//! - Request-scoped batched loaders for relationship fields

pub mod loaders;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod types;

pub use loaders::{LoaderSettings, Loaders};
pub use schema::{build_schema, with_request_loaders, BookshelfSchema, SchemaBuilder};

use async_graphql::ErrorExtensions;

use crate::error::ApiError;

/// Convert an error into a GraphQL field error carrying `extensions.code`
pub(crate) fn to_graphql_error(error: impl Into<ApiError>) -> async_graphql::Error {
    let error: ApiError = error.into();
    error.extend()
}
