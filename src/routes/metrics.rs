//! Process counters endpoint.

use axum::{extract::State, Json};

use crate::metrics::CountersSnapshot;
use crate::state::AppState;

/// `GET /metrics` handler. Reads the counters without side effects.
///
/// The snapshot includes the request currently being served: the pipeline
/// increments the total counter before this handler runs.
pub async fn snapshot(State(state): State<AppState>) -> Json<CountersSnapshot> {
    Json(state.counters.snapshot())
}
