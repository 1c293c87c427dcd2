//! HTTP route handlers for the API surface.
//!
//! Three operations: liveness check, status submission, and a process
//! counters snapshot. Every route runs inside the request pipeline
//! middleware, which generates a unique request ID per request, maintains
//! the total/failed counters, and logs start and completion with duration.

pub mod health;
pub mod metrics;
pub mod status;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::middleware::request_pipeline;
use crate::state::AppState;

/// Creates the Axum router with all routes, CORS, and the request pipeline.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::check))
        .route("/status", post(status::submit))
        .route("/metrics", get(metrics::snapshot))
        .with_state(state.clone())
        // Browser clients poll these endpoints cross-origin
        .layer(CorsLayer::permissive())
        // Request pipeline - outermost layer so every request is counted and
        // timed regardless of handler outcome
        .layer(middleware::from_fn_with_state(state, request_pipeline))
}
