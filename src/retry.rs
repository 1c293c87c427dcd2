//! Bounded retry with fixed backoff.
//!
//! Reusable combinator for transient-failure loops; session acquisition wraps
//! its pool checkout in this rather than duplicating retry logic inline.

use std::future::Future;
use std::time::Duration;

/// Runs `op` up to `max_attempts` times, sleeping `delay` between attempts.
///
/// The final attempt's error propagates unchanged; intermediate failures are
/// logged at debug level. `max_attempts` of zero is treated as one.
pub async fn with_fixed_backoff<T, E, F, Fut>(
    max_attempts: u32,
    delay: Duration,
    mut op: F,
) -> Result<T, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let budget = max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(error) if attempt < budget => {
                tracing::debug!(
                    attempt,
                    max_attempts = budget,
                    error = %error,
                    "Attempt failed, retrying after backoff"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
