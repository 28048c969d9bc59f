//! GraphQL HTTP route handlers
//!
//! - `POST /graphql` - Execute a GraphQL request
//! - `GET /graphql/playground` - GraphQL Playground

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::Extension, response::IntoResponse};

use crate::graphql::{with_request_loaders, BookshelfSchema, LoaderSettings};
use crate::repositories::SharedStore;

/// What the GraphQL handler needs to run a request
#[derive(Clone)]
pub struct GraphQLState {
    pub schema: BookshelfSchema,
    pub store: SharedStore,
    pub loader_settings: LoaderSettings,
}

/// GraphQL handler that executes queries against the schema
///
/// Every request gets its own loaders, so batching and caching never cross
/// request boundaries.
pub async fn graphql_handler(
    Extension(state): Extension<GraphQLState>,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = with_request_loaders(req.into_inner(), &state.store, state.loader_settings);
    state.schema.execute(request).await.into()
}

/// GraphQL Playground handler
pub async fn graphql_playground() -> impl IntoResponse {
    axum::response::Html(async_graphql::http::playground_source(
        async_graphql::http::GraphQLPlaygroundConfig::new("/graphql"),
    ))
}
