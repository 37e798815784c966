//! Integration tests for health endpoints.

mod common;

use axum::http::{header, Method, StatusCode};
use common::{empty_request, TestApp};

#[tokio::test]
async fn test_health_check_with_memory_store() {
    let app = TestApp::new();

    let (status, body) = app
        .send(empty_request(Method::GET, "/api/health", None))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["backend"], "memory");
    assert_eq!(body["database"]["connected"], true);
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let app = TestApp::new();

    let (status, body) = app
        .send(empty_request(Method::GET, "/api/health/live", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body) = app
        .send(empty_request(Method::GET, "/api/health/ready", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .uri("/api/health/live")
        .header("x-request-id", "abc-123")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "abc-123");
    assert!(response.headers().get(header::CONTENT_TYPE).is_some());
}
