//! Persisted record types.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// One row of the append-only `connection_logs` table.
///
/// `id` is assigned by the store on insert and immutable afterwards.
/// `checked_at` is always set server-side in the fixed civil timezone; it is
/// never trusted from the caller. Rows are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ConnectionLogEntry {
    pub id: i32,
    pub status: String,
    pub response_time_ms: f64,
    pub checked_at: DateTime<FixedOffset>,
}
