//! Timezone-aware clock abstraction.
//!
//! All displayed and stored timestamps use a fixed civil timezone (IST,
//! UTC+05:30), never UTC and never a caller-supplied value. Handlers take the
//! clock through [`Clock`] so tests can substitute a fixed or stepping clock.

use chrono::{DateTime, FixedOffset, Utc};

use crate::config::{TIMESTAMP_FORMAT, TIMEZONE_UTC_OFFSET_SECS};

/// Source of the current time in the configured civil timezone.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// System clock pinned to the fixed IST offset.
#[derive(Debug, Clone, Copy)]
pub struct CivilClock {
    offset: FixedOffset,
}

impl CivilClock {
    pub fn new() -> Self {
        // Offset is a compile-time constant well inside chrono's valid range.
        let offset = FixedOffset::east_opt(TIMEZONE_UTC_OFFSET_SECS)
            .expect("civil timezone offset out of range");
        Self { offset }
    }
}

impl Default for CivilClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for CivilClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Renders a snapshot timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(at: DateTime<FixedOffset>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
