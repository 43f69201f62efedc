//! HTTP route handlers.
//!
//! The router carries two global middleware layers: the request ID layer,
//! outermost, which opens the per-request tracing span, and the JSON body
//! layer, which parses request bodies before any route or the fallback runs.
//! Handler panics are caught and rendered as JSON 500 responses.
//!
//! Unknown paths and known paths requested with an unsupported method both
//! answer with the JSON 404 from [`not_found`].

pub mod health;
pub mod home;

use axum::{
    extract::{DefaultBodyLimit, OriginalUri},
    http::Method,
    middleware,
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::{panic_response, AppError};
use crate::middleware::{json_body_layer, request_id_layer};
use crate::state::AppState;

/// Fallback for paths with no route, and for methods a route does not handle.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::RouteNotFound {
        method,
        path: uri.path().to_string(),
    }
}

/// Creates the Axum router with all routes and global middleware.
pub fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(home::index).fallback(not_found))
        .merge(health::router());

    with_middleware(routes, state)
}

/// Installs the not-found fallback and the global middleware on `routes`.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let body_limit = state.config.body.limit_bytes;

    routes
        .fallback(not_found)
        .with_state(state.clone())
        .layer(CatchPanicLayer::custom(panic_response))
        // JSON body layer - rejects malformed bodies before routing
        .layer(middleware::from_fn_with_state(state, json_body_layer))
        .layer(DefaultBodyLimit::max(body_limit))
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
