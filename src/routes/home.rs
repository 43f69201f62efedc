//! Root route returning the service greeting.

use axum::Json;
use serde::Serialize;

use crate::config::ROOT_GREETING;

#[derive(Debug, Serialize)]
pub struct Greeting {
    pub message: &'static str,
}

/// Handler for `GET /`.
pub async fn index() -> Json<Greeting> {
    Json(Greeting {
        message: ROOT_GREETING,
    })
}
