//! Test fixtures for API integration tests
//!
//! Builds a complete application over an instrumented store, seeded with the
//! sample library.

use std::sync::Arc;

use async_graphql::Request;
use axum::Router;
use serde_json::Value;

use bookshelf_api::graphql::{with_request_loaders, BookshelfSchema, LoaderSettings, SchemaBuilder};
use bookshelf_api::repositories::SharedStore;
use bookshelf_api::routes::{app_router, GraphQLState, HealthState};
use bookshelf_api::services::{seed_library, MutationPolicy};

use super::mocks::CountingStore;

/// Sample library titles in publication date order
pub const TITLES_BY_DATE: &[&str] = &[
    "The Awakening",
    "The Great Gatsby",
    "1984",
    "The Bell Jar",
    "City of Glass",
    "Les aventures de Clément",
];

/// Application under test
pub struct TestApp {
    pub store: Arc<CountingStore>,
    pub shared: SharedStore,
    pub schema: BookshelfSchema,
    pub settings: LoaderSettings,
}

impl TestApp {
    /// Empty store, default policies
    pub fn empty() -> Self {
        Self::with_policy(MutationPolicy::default())
    }

    /// Empty store with the given policies
    pub fn with_policy(policy: MutationPolicy) -> Self {
        let store = Arc::new(CountingStore::new());
        let shared: SharedStore = store.clone();
        let schema = SchemaBuilder::new()
            .store(shared.clone())
            .policy(policy)
            .max_depth(10)
            .build()
            .expect("schema should build");

        Self {
            store,
            shared,
            schema,
            settings: LoaderSettings::default(),
        }
    }

    /// Sample library, default policies
    pub async fn seeded() -> Self {
        Self::seeded_with_policy(MutationPolicy::default()).await
    }

    /// Sample library with the given policies
    pub async fn seeded_with_policy(policy: MutationPolicy) -> Self {
        let app = Self::with_policy(policy);
        seed_library(&app.shared).await.expect("seeding should succeed");
        app.store.reset();
        app
    }

    /// Execute a GraphQL document with fresh request loaders
    pub async fn execute(&self, query: &str) -> async_graphql::Response {
        let request = with_request_loaders(Request::new(query), &self.shared, self.settings);
        self.schema.execute(request).await
    }

    /// Execute a document that must succeed and return its `data`
    pub async fn data(&self, query: &str) -> Value {
        let response = self.execute(query).await;
        assert!(
            response.errors.is_empty(),
            "unexpected errors: {:?}",
            response.errors
        );
        response.data.into_json().expect("data should be JSON")
    }

    /// The HTTP router over this app's store and schema
    pub fn router(&self) -> Router {
        app_router(
            GraphQLState {
                schema: self.schema.clone(),
                store: self.shared.clone(),
                loader_settings: self.settings,
            },
            HealthState::new(self.shared.clone(), "memory"),
        )
    }
}

/// Titles of a JSON list of books
pub fn titles(books: &Value) -> Vec<String> {
    books
        .as_array()
        .expect("expected a list of books")
        .iter()
        .map(|b| b["title"].as_str().unwrap_or_default().to_string())
        .collect()
}
