//! Process-lifetime request counters.
//!
//! A simple request/failure tally visible process-wide. Counters are atomics
//! injected into the request pipeline at startup; they reset to zero on every
//! process start and are never persisted.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// In-memory counters mutated by every request.
#[derive(Debug, Default)]
pub struct RequestCounters {
    total: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time view of the counters, serialized for `GET /metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountersSnapshot {
    #[serde(rename = "TOTAL REQUESTS")]
    pub total_requests: u64,
    #[serde(rename = "FAILED REQUESTS")]
    pub failed_requests: u64,
}

impl RequestCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an inbound request.
    pub fn record_request(&self) {
        self.total.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a response with status code >= 400.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            total_requests: self.total.load(Ordering::Relaxed),
            failed_requests: self.failed.load(Ordering::Relaxed),
        }
    }
}
