//! Status submission endpoint: log a connectivity entry, return recent ones.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::clock::format_timestamp;
use crate::config::TIMEZONE_LABEL;
use crate::db::ConnectionLogEntry;
use crate::error::AppError;
use crate::state::AppState;

/// Request body for `POST /status`.
#[derive(Debug, Deserialize)]
pub struct StatusLogRequest {
    pub status: String,
    pub response_time_ms: f64,
}

/// Response body: the liveness snapshot fields plus the recent entries.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub timestamp: String,
    pub timezone: String,
    pub logs: Vec<ConnectionLogEntry>,
}

/// `POST /status` handler.
///
/// Short-circuits with 503 when the simulated-outage flag is active, without
/// persisting anything. Otherwise records the entry with a server-assigned
/// `checked_at` and returns the 10 most recent entries, newest first. The
/// snapshot fields reuse the write's timestamp; the database is not probed a
/// second time.
pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<StatusLogRequest>,
) -> Result<Json<StatusResponse>, AppError> {
    if state.config.flags.simulate_outage {
        tracing::warn!("Simulated outage flag active, rejecting status submission");
        return Err(AppError::SimulatedOutage);
    }

    let checked_at = state.clock.now();
    let logs = state
        .store
        .record_and_list(&payload.status, payload.response_time_ms, checked_at)
        .await?;

    Ok(Json(StatusResponse {
        status: "UP".to_string(),
        timestamp: format_timestamp(checked_at),
        timezone: TIMEZONE_LABEL.to_string(),
        logs,
    }))
}
