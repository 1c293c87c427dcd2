use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Fixed detail string for database-outage responses. Deliberately vague:
/// internal error details never reach the caller.
pub const DETAIL_DB_UNREACHABLE: &str = "Database not reachable";

/// Fixed detail string for failed status-log writes.
pub const DETAIL_PERSIST_FAILED: &str = "Failed to record status log";

/// Request-scoped error taxonomy for the API surface.
///
/// Every variant maps to a 503: each one reflects a dependency outage
/// (real or simulated) rather than a programming error.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Fault-injection flag is active; the database was never touched.
    #[error("simulated outage active")]
    SimulatedOutage,

    /// Database unreachable or the liveness probe failed.
    #[error("database connectivity error: {0}")]
    Connectivity(#[source] sqlx::Error),

    /// Status-log insert or commit failed; nothing was persisted.
    #[error("status log persistence error: {0}")]
    Persistence(#[source] sqlx::Error),
}

impl AppError {
    /// The fixed human-readable message returned to the caller.
    pub fn detail(&self) -> &'static str {
        match self {
            AppError::SimulatedOutage | AppError::Connectivity(_) => DETAIL_DB_UNREACHABLE,
            AppError::Persistence(_) => DETAIL_PERSIST_FAILED,
        }
    }

    /// The HTTP status this error translates to.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        let body = Json(json!({ "detail": self.detail() }));
        (self.status_code(), body).into_response()
    }
}
