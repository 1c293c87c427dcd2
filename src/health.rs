//! Database-backed health probing.
//!
//! A single probe, no internal retries beyond the session acquisition budget:
//! one failed probe is reported immediately and retrying is left to the
//! caller or monitor.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::clock::{format_timestamp, Clock};
use crate::config::{FeatureFlags, TIMEZONE_LABEL};
use crate::db::StatusStore;
use crate::error::AppError;

/// Liveness snapshot returned by `GET /health` and echoed by `POST /status`.
#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub status: String,
    pub timestamp: String,
    pub timezone: String,
}

impl HealthSnapshot {
    /// Builds an "UP" snapshot for the given civil-timezone instant.
    pub fn up_at(at: DateTime<FixedOffset>) -> Self {
        Self {
            status: "UP".to_string(),
            timestamp: format_timestamp(at),
            timezone: TIMEZONE_LABEL.to_string(),
        }
    }
}

/// Determines liveness of the service and its database dependency.
///
/// When the simulated-outage flag is active, fails immediately without
/// touching the database. Otherwise runs the trivial probe query on a
/// validated, timeout-bounded session.
pub async fn probe(
    flags: FeatureFlags,
    store: &dyn StatusStore,
    clock: &dyn Clock,
) -> Result<HealthSnapshot, AppError> {
    if flags.simulate_outage {
        tracing::warn!("Simulated outage flag active, reporting database as down");
        return Err(AppError::SimulatedOutage);
    }

    store.ping().await?;
    Ok(HealthSnapshot::up_at(clock.now()))
}
