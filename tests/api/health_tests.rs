use axum::http::StatusCode;
use serde_json::Value;

use crate::common::{json_body, TestApp};

#[tokio::test]
async fn health_check_is_public() {
    let app = TestApp::new();

    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn liveness_reports_alive() {
    let response = TestApp::new().get("/health/live", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn readiness_pings_the_store() {
    let response = TestApp::new().get("/health/ready", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = json_body(response).await;
    assert_ne!(body["checks"]["database"]["status"], "unhealthy");
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = TestApp::new();
    app.get("/health", None).await;

    let response = app.get("/metrics", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}
