//! ci-starter: a minimal JSON HTTP service.
//!
//! Serves a static greeting on `/` and a liveness probe on `/health`, with
//! JSON request bodies parsed by a global middleware ahead of routing.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::{create_router, with_middleware};
pub use state::AppState;
