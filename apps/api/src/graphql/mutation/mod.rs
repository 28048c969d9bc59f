//! GraphQL mutations for Bookshelf
//!
//! This module contains all mutation resolvers, organized by domain.

mod library;

pub use library::LibraryMutation;

use async_graphql::MergedObject;

/// Root mutation type combining all mutation domains
#[derive(MergedObject, Default)]
pub struct Mutation(LibraryMutation);
