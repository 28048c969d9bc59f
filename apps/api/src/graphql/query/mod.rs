//! GraphQL queries for Bookshelf
//!
//! This module contains all query resolvers, organized by domain.

mod library;

pub use library::{LibraryQuery, RECENT_BOOKS_LIMIT};

use async_graphql::MergedObject;

/// Root query type combining all query domains
#[derive(MergedObject, Default)]
pub struct Query(LibraryQuery);
