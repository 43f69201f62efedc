//! Health check endpoint for container orchestration.
//!
//! Provides a simple liveness probe that returns 200 OK when the process is running.
//! Used by Kubernetes, ECS, systemd, and load balancers to verify the service is alive.

use axum::{routing::get, Json, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use serde::Serialize;
use tower_http::set_header::SetResponseHeaderLayer;

use super::not_found;
use crate::config::{CACHE_CONTROL_HEALTH, HEALTH_PATH, HEALTH_PATH_SLASH, HEALTH_STATUS_OK};

/// Body of a health response.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// Health sub-router owning the `/health` prefix.
///
/// Answers with and without a trailing slash, since probes are configured
/// both ways. No caching, always fresh for liveness probes.
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route(HEALTH_PATH, get(health).fallback(not_found))
        .route(HEALTH_PATH_SLASH, get(health).fallback(not_found))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_HEALTH),
        ))
}

/// Health check handler.
///
/// This is a liveness probe - it only checks that the process can respond to HTTP.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: HEALTH_STATUS_OK,
    })
}
