//! HTTP route handlers for the Bookshelf API
//!
//! This module contains the endpoint handlers and the router assembly:
//! - GraphQL endpoint and playground
//! - Health check and status endpoints

pub mod graphql;
pub mod health;

pub use graphql::{graphql_handler, graphql_playground, GraphQLState};
pub use health::{health_router, HealthState};

use axum::{
    extract::Extension,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the application router
///
/// CORS is left to the caller since it depends on deployment configuration.
pub fn app_router(graphql_state: GraphQLState, health_state: HealthState) -> Router {
    Router::new()
        .route("/", get(root))
        // GraphQL endpoints
        .route("/graphql", post(graphql_handler))
        .route("/graphql/playground", get(graphql_playground))
        // Nested health routes: /health, /health/live, /health/ready
        .nest("/health", health_router(health_state))
        .layer(Extension(graphql_state))
        .layer(TraceLayer::new_for_http())
}

async fn root() -> &'static str {
    "Welcome to Bookshelf - GraphQL API for books and authors"
}
