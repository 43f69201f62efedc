//! JSON request body parsing.
//!
//! Every request whose `Content-Type` is `application/json` has its body
//! buffered and parsed before routing. The size limit comes from the
//! `DefaultBodyLimit` layer installed on the router. Rejections are returned
//! as `AppError` responses, so a malformed body fails with 400 even on paths
//! that would otherwise be 404. The parsed value is stored as [`JsonBody`] in
//! the request extensions and the buffered bytes are put back as the body.

use axum::{
    body::{Body, Bytes},
    extract::{rejection::BytesRejection, FromRequest, Request, State},
    middleware::Next,
    response::Response,
};
use http::{header::CONTENT_TYPE, HeaderMap, StatusCode};
use serde_json::{Map, Value};

use crate::config::{JsonBodyConfig, JSON_MEDIA_TYPE};
use crate::error::AppError;
use crate::state::AppState;

/// Parsed JSON request body. An empty body is recorded as `{}`.
#[derive(Clone, Debug, PartialEq)]
pub struct JsonBody(pub Value);

/// Middleware that parses JSON request bodies ahead of the router.
pub async fn json_body_layer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(charset) = json_charset(request.headers()) else {
        return Ok(next.run(request).await);
    };

    if let Some(charset) = charset {
        if !is_utf8(&charset) {
            return Err(AppError::UnsupportedCharset(charset));
        }
    }

    let config = &state.config.body;
    let (mut parts, body) = request.into_parts();

    // `Bytes` reads the body limit from the extensions
    let mut buffered = Request::new(body);
    buffered.extensions_mut().extend(parts.extensions.clone());
    let bytes = Bytes::from_request(buffered, &state)
        .await
        .map_err(|rejection| body_rejection(rejection, config.limit_bytes))?;

    let value = parse_json(&bytes, config)?;
    tracing::trace!(bytes = bytes.len(), "Parsed JSON body");

    parts.extensions.insert(JsonBody(value));
    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

/// Parses a buffered body, applying strict mode when configured.
pub fn parse_json(bytes: &[u8], config: &JsonBodyConfig) -> Result<Value, AppError> {
    if bytes.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let value: Value = serde_json::from_slice(bytes)?;
    if config.strict && !(value.is_object() || value.is_array()) {
        return Err(AppError::NotStrictJson);
    }
    Ok(value)
}

/// Returns `None` when the request is not JSON, otherwise the charset
/// parameter of its content type if one was given.
fn json_charset(headers: &HeaderMap) -> Option<Option<String>> {
    let value = headers.get(CONTENT_TYPE)?.to_str().ok()?;
    let mut params = value.split(';');

    let media_type = params.next()?.trim();
    if !media_type.eq_ignore_ascii_case(JSON_MEDIA_TYPE) {
        return None;
    }

    let charset = params.find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_string())
    });
    Some(charset)
}

fn is_utf8(charset: &str) -> bool {
    charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("utf8")
}

fn body_rejection(rejection: BytesRejection, limit: usize) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::BodyRead(rejection)
    }
}
