//! Health check endpoint for container orchestration and frontend probes.
//!
//! Unlike a bare process-liveness probe, this verifies the database
//! dependency: the handler runs the trivial probe query on a validated
//! session and reports 503 when the database is unreachable.

use axum::{extract::State, Json};

use crate::error::AppError;
use crate::health::{self, HealthSnapshot};
use crate::state::AppState;

/// `GET /health` handler.
///
/// Returns the liveness snapshot (status, civil-timezone timestamp, timezone
/// label) or a 503 with a fixed detail message when the probe fails.
pub async fn check(State(state): State<AppState>) -> Result<Json<HealthSnapshot>, AppError> {
    let snapshot = health::probe(
        state.config.flags,
        state.store.as_ref(),
        state.clock.as_ref(),
    )
    .await?;
    Ok(Json(snapshot))
}
