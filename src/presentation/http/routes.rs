//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{auth_middleware, require_read, require_write, track_metrics};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.settings.upload.max_request_bytes;

    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Public
        .nest("/auth", auth_routes())
        // Protected
        .nest("/products", product_routes(state))
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new().route("/token", post(handlers::auth::issue_token))
}

/// Product routes (bearer token required, READ or WRITE per route)
fn product_routes(state: AppState) -> Router<AppState> {
    let read = Router::new()
        .route("/all", get(handlers::product::find_products_by_name_or_brand))
        .route("/admin/all", get(handlers::product::find_all))
        .route("/last", get(handlers::product::find_last_products))
        .route_layer(middleware::from_fn(require_read));

    let write = Router::new()
        .route(
            "/",
            post(handlers::product::create_products)
                .patch(handlers::product::patch_product_quantity),
        )
        .route_layer(middleware::from_fn(require_write));

    read.merge(write)
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
