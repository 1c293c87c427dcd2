//! Startup sequencer: one-shot preflight checks before the listener binds.
//!
//! Startup failure is not recoverable in-process. The process must exit
//! rather than serve traffic against a dead dependency.

use crate::config::FeatureFlags;
use crate::db::StatusStore;
use crate::error::AppError;

/// Fatal startup error. Surfaced in logs only; the service never begins
/// accepting traffic when preflight fails.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("crash simulation flag active, aborting startup")]
    CrashSimulated,

    #[error("database unreachable during startup check: {0}")]
    DatabaseUnreachable(#[from] AppError),
}

/// Runs the startup checks exactly once before the service accepts traffic.
///
/// Order: log the startup-beginning event, honor the crash-simulation flag,
/// then verify database reachability with the trivial probe query. The probe
/// session is released on every path by the pool guard.
pub async fn preflight(flags: FeatureFlags, store: &dyn StatusStore) -> Result<(), StartupError> {
    tracing::info!("Running startup checks");

    if flags.simulate_crash {
        tracing::warn!("Crash simulation flag active, aborting startup");
        return Err(StartupError::CrashSimulated);
    }

    match store.ping().await {
        Ok(()) => {
            tracing::info!("Database reachable, startup checks passed");
            Ok(())
        }
        Err(error) => {
            tracing::error!(error = %error, "Database unreachable, refusing to start");
            Err(error.into())
        }
    }
}
