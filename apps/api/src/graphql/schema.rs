//! GraphQL schema builder for Bookshelf
//!
//! This module provides the schema construction for the async-graphql API
//! and the per-request setup every executed request goes through.

use async_graphql::{EmptySubscription, Request, Schema};

use crate::error::{ApiError, ApiResult};
use crate::repositories::SharedStore;
use crate::services::{LibraryService, MutationPolicy};

use super::loaders::{LoaderSettings, Loaders};
use super::mutation::Mutation;
use super::query::Query;

/// The Bookshelf GraphQL schema type
pub type BookshelfSchema = Schema<Query, Mutation, EmptySubscription>;

/// Builder for constructing the GraphQL schema with required services
pub struct SchemaBuilder {
    store: Option<SharedStore>,
    policy: MutationPolicy,
    max_depth: Option<usize>,
}

impl SchemaBuilder {
    /// Create a new schema builder
    pub fn new() -> Self {
        Self {
            store: None,
            policy: MutationPolicy::default(),
            max_depth: None,
        }
    }

    /// Set the entity store
    pub fn store(mut self, store: SharedStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the mutation policies
    pub fn policy(mut self, policy: MutationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject queries nested deeper than `max_depth`
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Build the schema with all configured services
    ///
    /// Fails with a configuration error when no store was set.
    pub fn build(self) -> ApiResult<BookshelfSchema> {
        let store = self
            .store
            .ok_or_else(|| ApiError::Configuration("entity store is required".to_string()))?;

        let mut builder = Schema::build(Query::default(), Mutation::default(), EmptySubscription)
            .data(LibraryService::new(store.clone(), self.policy))
            .data(store);

        if let Some(max_depth) = self.max_depth {
            builder = builder.limit_depth(max_depth);
        }

        Ok(builder.finish())
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a new GraphQL schema over `store` with default policies
pub fn build_schema(store: SharedStore) -> ApiResult<BookshelfSchema> {
    SchemaBuilder::new().store(store).build()
}

/// Attach a fresh set of loaders to `request`
///
/// Loaders cache per request; they must never be shared between requests.
pub fn with_request_loaders(
    request: Request,
    store: &SharedStore,
    settings: LoaderSettings,
) -> Request {
    request.data(Loaders::new(store.clone(), settings))
}
