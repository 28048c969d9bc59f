//! Test helper functions for API integration tests
//!
//! Provides utility functions for driving the router and reading responses.

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

/// Send a GET request and return status and body text
pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// POST a GraphQL document to `/graphql` and return status and JSON body
pub async fn post_graphql(app: Router, query: &str) -> (StatusCode, Value) {
    let payload = serde_json::json!({ "query": query });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

/// Error codes of a GraphQL response, in error order
pub fn error_codes(response: &async_graphql::Response) -> Vec<String> {
    response
        .errors
        .iter()
        .map(|e| {
            let extensions = serde_json::to_value(&e.extensions).unwrap_or(Value::Null);
            extensions["code"].as_str().unwrap_or_default().to_string()
        })
        .collect()
}
