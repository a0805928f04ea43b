//! Health Check API Tests

use std::sync::atomic::Ordering;

use axum::http::{Method, StatusCode};
use serde_json::json;
use test_case::test_case;

use crate::common::TestApp;

#[test_case("/health" ; "health")]
#[test_case("/health-check" ; "health check")]
#[test_case("/ping" ; "ping")]
#[tokio::test]
async fn test_liveness_endpoints(uri: &str) {
    let app = TestApp::new();

    let response = app.request(Method::GET, uri, None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "server": "OK" }));
}

#[tokio::test]
async fn test_readiness_follows_datastore() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/health/ready", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["datastore"], "OK");

    app.probe.down.store(true, Ordering::SeqCst);

    let response = app.request(Method::GET, "/health/ready", None, None).await;
    assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json()["datastore"], "UNAVAILABLE");
}

#[tokio::test]
async fn test_unknown_route_is_not_found_envelope() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/api/nowhere", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({ "message": "route not found" }));
}

#[tokio::test]
async fn test_responses_carry_security_headers_and_request_id() {
    let app = TestApp::new();

    let response = app.request(Method::GET, "/health", None, None).await;

    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert!(response.headers.get("x-request-id").is_some());
    assert!(response.headers.get("strict-transport-security").is_none());
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_http_counter() {
    let app = TestApp::new();
    app.request(Method::GET, "/ping", None, None).await;

    let response = app.request(Method::GET, "/metrics", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.text().contains("schat_http_requests_total"));
}
