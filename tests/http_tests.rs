//! Router-level tests.
//!
//! These drive the full router, middleware included, in-process with
//! `tower::ServiceExt::oneshot`, so no port is bound.
//!
//! Run with: cargo test --test http_tests

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    routing::get as get_route,
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use ci_starter::config::{AppConfig, JsonBodyConfig, REQUEST_ID_HEADER};
use ci_starter::{create_router, with_middleware, AppState};

fn app() -> Router {
    create_router(AppState::new(AppConfig::default()))
}

fn app_with_body(body: JsonBodyConfig) -> Router {
    create_router(AppState::new(AppConfig {
        body,
        ..AppConfig::default()
    }))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn root_returns_greeting() {
    let response = send(app(), get("/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Hello from Express CI Starter 👋" })
    );
}

#[tokio::test]
async fn health_returns_ok() {
    let response = send(app(), get("/health")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn root_has_no_cache_override() {
    let response = send(app(), get("/")).await;
    assert!(response.headers().get(header::CACHE_CONTROL).is_none());
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let response = send(app(), get("/nonexistent")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Cannot GET /nonexistent" })
    );
}

#[tokio::test]
async fn health_answers_with_trailing_slash() {
    let response = send(app(), get("/health/")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-store");
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn unknown_path_under_health_is_not_found() {
    let response = send(app(), get("/health/deep")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_on_root_is_bad_request() {
    let response = send(app(), json_request(Method::POST, "/", "{bad json")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Malformed JSON body"));
}

#[tokio::test]
async fn malformed_json_is_rejected_before_routing() {
    let response = send(app(), json_request(Method::POST, "/nonexistent", "{bad json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(app(), json_request(Method::GET, "/health", "{bad json")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn valid_json_passes_through_to_routing() {
    let response = send(app(), json_request(Method::GET, "/health", r#"{"probe":true}"#)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(app(), json_request(Method::POST, "/nonexistent", "{}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unsupported_method_on_known_path_is_not_found() {
    let response = send(app(), json_request(Method::POST, "/", "{}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Cannot POST /" })
    );

    let request = Request::builder()
        .method(Method::DELETE)
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = send(app(), request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Cannot DELETE /health" })
    );
}

#[tokio::test]
async fn whitespace_only_json_body_is_bad_request() {
    let response = send(app(), json_request(Method::POST, "/nonexistent", "   \n")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_json_body_is_accepted() {
    let response = send(app(), json_request(Method::GET, "/", "")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_json_content_type_is_not_parsed() {
    let request = Request::builder()
        .uri("/")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("{bad json"))
        .unwrap();
    let response = send(app(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn scalar_json_rejected_in_strict_mode() {
    let response = send(app(), json_request(Method::GET, "/", "42")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let lenient = app_with_body(JsonBodyConfig {
        strict: false,
        ..JsonBodyConfig::default()
    });
    let response = send(lenient, json_request(Method::GET, "/", "42")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn oversized_body_is_payload_too_large() {
    let small = || {
        app_with_body(JsonBodyConfig {
            limit_bytes: 8,
            ..JsonBodyConfig::default()
        })
    };

    let response = send(small(), json_request(Method::GET, "/", r#"{"key":"long value"}"#)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let body = body_json(response).await;
    assert_eq!(body, json!({ "error": "Request body exceeds 8 bytes" }));

    // At the limit is fine
    let response = send(small(), json_request(Method::GET, "/", r#"{"k":1}"#)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // Bodies that are not JSON are never buffered, so the limit does not apply
    let request = Request::builder()
        .uri("/")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("x".repeat(64)))
        .unwrap();
    let response = send(small(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn non_utf8_charset_is_unsupported() {
    let request = Request::builder()
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json; charset=latin1")
        .body(Body::from("{}"))
        .unwrap();
    let response = send(app(), request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let request = Request::builder()
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from("{}"))
        .unwrap();
    let response = send(app(), request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn repeated_requests_yield_identical_responses() {
    let app = app();
    for uri in ["/", "/health"] {
        let first = send(app.clone(), get(uri)).await;
        let second = send(app.clone(), get(uri)).await;

        assert_eq!(first.status(), second.status());
        assert_eq!(body_bytes(first).await, body_bytes(second).await);
    }
}

#[tokio::test]
async fn every_response_carries_request_id() {
    for request in [
        get("/"),
        get("/health"),
        get("/nonexistent"),
        json_request(Method::POST, "/", "{bad json"),
    ] {
        let response = send(app(), request).await;
        let id = response.headers()[REQUEST_ID_HEADER].to_str().unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok(), "unexpected request id {id:?}");
    }
}

#[tokio::test]
async fn request_ids_are_unique() {
    let first = send(app(), get("/")).await;
    let second = send(app(), get("/")).await;
    assert_ne!(
        first.headers()[REQUEST_ID_HEADER],
        second.headers()[REQUEST_ID_HEADER]
    );
}

async fn explode() -> &'static str {
    panic!("handler exploded")
}

#[tokio::test]
async fn handler_panic_becomes_json_500() {
    let routes = Router::new().route("/explode", get_route(explode));
    let app = with_middleware(routes, AppState::new(AppConfig::default()));

    let response = send(app, get("/explode")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Internal server error" })
    );
}
