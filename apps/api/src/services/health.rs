//! Health check service for the entity store
//!
//! Readiness depends on a single dependency: the configured entity store,
//! probed with [`EntityStore::ping`](crate::repositories::EntityStore::ping).

use serde::Serialize;
use std::time::{Duration, Instant};

use crate::error::ApiError;
use crate::repositories::SharedStore;

/// Status of an individual dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    /// Dependency is healthy and responding
    Healthy,
    /// Dependency is unhealthy or unreachable
    Unhealthy,
}

/// Result of a single dependency check
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    /// Name of the dependency
    pub name: &'static str,
    /// Current status
    pub status: ServiceStatus,
    /// Response time in milliseconds
    pub response_time_ms: u64,
    /// Error message if unhealthy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional details about the dependency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceHealth {
    /// Create a healthy result with details
    pub fn healthy(name: &'static str, response_time: Duration, details: serde_json::Value) -> Self {
        Self {
            name,
            status: ServiceStatus::Healthy,
            response_time_ms: response_time.as_millis() as u64,
            error: None,
            details: Some(details),
        }
    }

    /// Create an unhealthy result
    pub fn unhealthy(
        name: &'static str,
        error: impl Into<String>,
        response_time: Duration,
    ) -> Self {
        Self {
            name,
            status: ServiceStatus::Unhealthy,
            response_time_ms: response_time.as_millis() as u64,
            error: Some(error.into()),
            details: None,
        }
    }
}

/// Aggregated health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthCheckResponse {
    /// Overall status (healthy only if every dependency is healthy)
    pub status: ServiceStatus,
    /// Individual dependency results
    pub services: Vec<ServiceHealth>,
    /// Total time to complete all checks
    pub total_time_ms: u64,
    /// API version
    pub version: &'static str,
}

impl HealthCheckResponse {
    /// Build a response from individual results
    pub fn new(services: Vec<ServiceHealth>, total_time: Duration) -> Self {
        let status = if services.iter().all(|s| s.status == ServiceStatus::Healthy) {
            ServiceStatus::Healthy
        } else {
            ServiceStatus::Unhealthy
        };

        Self {
            status,
            services,
            total_time_ms: total_time.as_millis() as u64,
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    /// Check if overall health is good
    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}

/// Health check service
#[derive(Clone)]
pub struct HealthService {
    store: SharedStore,
    backend: &'static str,
}

impl HealthService {
    /// Create a health service probing `store`
    ///
    /// `backend` is reported as detail, e.g. `"memory"` or `"postgres"`.
    pub fn new(store: SharedStore, backend: &'static str) -> Self {
        Self { store, backend }
    }

    /// Ping the entity store
    pub async fn check_store(&self) -> ServiceHealth {
        let start = Instant::now();
        match self.store.ping().await {
            Ok(()) => ServiceHealth::healthy(
                "store",
                start.elapsed(),
                serde_json::json!({ "backend": self.backend }),
            ),
            Err(e) => {
                let error = ApiError::DatabaseUnavailable;
                tracing::warn!(
                    error = %e,
                    code = error.error_code(),
                    backend = self.backend,
                    "Store health check failed"
                );
                ServiceHealth::unhealthy("store", format!("{error}: {e}"), start.elapsed())
            }
        }
    }

    /// Run every dependency check
    pub async fn check_all(&self) -> HealthCheckResponse {
        let start = Instant::now();
        let store = self.check_store().await;
        HealthCheckResponse::new(vec![store], start.elapsed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::repositories::MemoryStore;

    #[test]
    fn test_response_status_aggregation() {
        let ok = ServiceHealth::healthy("store", Duration::from_millis(1), serde_json::json!({}));
        let bad = ServiceHealth::unhealthy("store", "down", Duration::from_millis(1));

        assert!(HealthCheckResponse::new(vec![ok.clone()], Duration::ZERO).is_healthy());
        assert!(!HealthCheckResponse::new(vec![ok, bad], Duration::ZERO).is_healthy());
    }

    #[test]
    fn test_unhealthy_serialization() {
        let bad = ServiceHealth::unhealthy("store", "connection refused", Duration::from_millis(3));
        let json = serde_json::to_value(&bad).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["error"], "connection refused");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_memory_store_is_healthy() {
        let service = HealthService::new(Arc::new(MemoryStore::new()), "memory");
        let response = service.check_all().await;

        assert!(response.is_healthy());
        assert_eq!(response.services[0].details, Some(serde_json::json!({ "backend": "memory" })));
    }
}
