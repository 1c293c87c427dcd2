//! Request pipeline middleware: instrumentation and process counters.
//!
//! Generates a UUID v4 for each incoming request and creates a tracing span
//! that wraps the entire request lifecycle. All logs emitted during request
//! processing will include the request_id field for correlation. The pipeline
//! also maintains the process-wide total/failed request counters and emits
//! start- and end-of-request log entries with the measured duration.

use std::time::Instant;

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

use crate::state::AppState;

/// Extension type for accessing request ID in handlers if needed.
#[derive(Clone, Debug)]
pub struct RequestId(pub Uuid);

/// Rounds a wall-clock duration in milliseconds to two decimal places.
pub fn round_duration_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

/// Middleware wrapping every inbound call.
///
/// This should be the outermost layer so the span wraps all request
/// processing. Runs unconditionally around the handler: the total counter is
/// incremented before the handler runs, and duration plus failure counting
/// are observed for every outcome the handler produces.
pub async fn request_pipeline(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let path = uri.path();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    state.counters.record_request();

    let mut request = request;
    request.extensions_mut().insert(RequestId(request_id));

    async move {
        tracing::info!("Request started");

        let response = next.run(request).await;

        let status = response.status();
        if status.as_u16() >= 400 {
            state.counters.record_failure();
        }
        let duration_ms = round_duration_ms(start.elapsed().as_secs_f64() * 1000.0);

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(status = status.as_u16(), duration_ms, "Request completed");

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_duration_to_two_decimals() {
        assert_eq!(round_duration_ms(12.3456), 12.35);
        assert_eq!(round_duration_ms(0.004), 0.0);
        assert_eq!(round_duration_ms(100.0), 100.0);
    }
}
