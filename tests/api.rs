//! Black-box API tests driving the full router through the request pipeline.
//!
//! The Postgres store is replaced with an in-memory double and the system
//! clock with a stepping test clock, so these tests exercise the complete
//! handler, middleware, and error-translation stack without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, FixedOffset};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use uplog::clock::Clock;
use uplog::config::{AppConfig, TIMEZONE_LABEL};
use uplog::db::{ConnectionLogEntry, StatusStore};
use uplog::error::AppError;
use uplog::routes::create_router;
use uplog::startup::{self, StartupError};
use uplog::state::AppState;

/// In-memory stand-in for the Postgres store. Failure toggles let tests
/// exercise the connectivity and persistence error paths.
#[derive(Default)]
struct InMemoryStore {
    rows: Mutex<Vec<ConnectionLogEntry>>,
    fail_ping: AtomicBool,
    fail_write: AtomicBool,
}

impl InMemoryStore {
    fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl StatusStore for InMemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_ping.load(Ordering::SeqCst) {
            return Err(AppError::Connectivity(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    async fn record_and_list(
        &self,
        status: &str,
        response_time_ms: f64,
        checked_at: DateTime<FixedOffset>,
    ) -> Result<Vec<ConnectionLogEntry>, AppError> {
        if self.fail_write.load(Ordering::SeqCst) {
            return Err(AppError::Persistence(sqlx::Error::PoolTimedOut));
        }
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i32 + 1;
        rows.push(ConnectionLogEntry {
            id,
            status: status.to_string(),
            response_time_ms,
            checked_at,
        });
        let mut recent = rows.clone();
        recent.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        recent.truncate(10);
        Ok(recent)
    }
}

/// Deterministic clock that advances one second per reading.
struct TickingClock {
    base: DateTime<FixedOffset>,
    ticks: AtomicI64,
}

impl TickingClock {
    fn new() -> Self {
        Self {
            base: DateTime::parse_from_rfc3339("2024-03-01T09:30:00+05:30").unwrap(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for TickingClock {
    fn now(&self) -> DateTime<FixedOffset> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.base + Duration::seconds(tick)
    }
}

fn test_config(simulate_outage: bool) -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DB_HOST", "localhost"),
        ("DB_PORT", "5432"),
        ("DB_NAME", "healthdb"),
        ("DB_USER", "app"),
        ("DB_PASSWORD", "secret"),
        (
            "SIMULATE_OUTAGE",
            if simulate_outage { "true" } else { "false" },
        ),
    ]);
    AppConfig::from_lookup(|var| vars.get(var).map(|v| v.to_string())).unwrap()
}

fn test_app(simulate_outage: bool) -> (Router, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::default());
    let state = AppState::new(
        test_config(simulate_outage),
        store.clone(),
        Arc::new(TickingClock::new()),
    );
    (create_router(state), store)
}

async fn get(app: &Router, path: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_status(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::post("/status")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_returns_up_snapshot() {
    let (app, _) = test_app(false);
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["timezone"], TIMEZONE_LABEL);
    assert_eq!(body["timestamp"], "2024-03-01 09:30:00");
}

#[tokio::test]
async fn health_reports_503_when_outage_simulated() {
    let (app, store) = test_app(true);
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Database not reachable");
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn health_reports_503_when_probe_fails() {
    let (app, store) = test_app(false);
    store.fail_ping.store(true, Ordering::SeqCst);
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Database not reachable");
}

#[tokio::test]
async fn status_echoes_the_submitted_entry() {
    let (app, store) = test_app(false);
    let (status, body) =
        post_status(&app, json!({"status": "UP", "response_time_ms": 12.5})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "UP");
    assert_eq!(body["timezone"], TIMEZONE_LABEL);
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 1);
    assert_eq!(logs[0]["status"], "UP");
    assert_eq!(logs[0]["response_time_ms"], 12.5);
    assert_eq!(logs[0]["id"], 1);
    assert_eq!(store.row_count(), 1);
}

#[tokio::test]
async fn fifteen_submissions_return_newest_ten() {
    let (app, store) = test_app(false);
    for i in 1..=15 {
        let (status, _) =
            post_status(&app, json!({"status": "UP", "response_time_ms": i as f64})).await;
        assert_eq!(status, StatusCode::OK);
    }
    assert_eq!(store.row_count(), 15);

    let (_, body) = post_status(&app, json!({"status": "UP", "response_time_ms": 16.0})).await;
    let logs = body["logs"].as_array().unwrap();
    assert_eq!(logs.len(), 10);
    // Newest first: the cap keeps the 10 most recently created entries.
    assert_eq!(logs[0]["response_time_ms"], 16.0);
    assert_eq!(logs[9]["response_time_ms"], 7.0);
    let timestamps: Vec<&str> = logs
        .iter()
        .map(|log| log["checked_at"].as_str().unwrap())
        .collect();
    let mut sorted = timestamps.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(timestamps, sorted);
}

#[tokio::test]
async fn outage_flag_blocks_status_and_persists_nothing() {
    let (app, store) = test_app(true);
    let (status, body) =
        post_status(&app, json!({"status": "UP", "response_time_ms": 5.0})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Database not reachable");
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn persistence_failure_reports_503_without_a_row() {
    let (app, store) = test_app(false);
    store.fail_write.store(true, Ordering::SeqCst);
    let (status, body) =
        post_status(&app, json!({"status": "DOWN", "response_time_ms": 3.0})).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["detail"], "Failed to record status log");
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn metrics_count_requests_and_failures() {
    let (app, store) = test_app(false);

    // The pipeline counts the metrics request itself before the handler runs.
    let (status, body) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["TOTAL REQUESTS"], 1);
    assert_eq!(body["FAILED REQUESTS"], 0);

    store.fail_ping.store(true, Ordering::SeqCst);
    let (status, _) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let (_, body) = get(&app, "/metrics").await;
    assert_eq!(body["TOTAL REQUESTS"], 3);
    assert_eq!(body["FAILED REQUESTS"], 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn counters_reconcile_under_concurrent_load() {
    let (app, _) = test_app(false);

    let mut handles = Vec::new();
    for i in 0..100 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let (status, _) =
                post_status(&app, json!({"status": "UP", "response_time_ms": i as f64})).await;
            assert_eq!(status, StatusCode::OK);
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let (_, body) = get(&app, "/metrics").await;
    assert_eq!(body["TOTAL REQUESTS"], 101);
    assert_eq!(body["FAILED REQUESTS"], 0);
}

#[tokio::test]
async fn crash_simulation_refuses_startup() {
    let store = InMemoryStore::default();
    let mut config = test_config(false);
    config.flags.simulate_crash = true;
    let result = startup::preflight(config.flags, &store).await;
    assert!(matches!(result, Err(StartupError::CrashSimulated)));
}

#[tokio::test]
async fn unreachable_database_refuses_startup() {
    let store = InMemoryStore::default();
    store.fail_ping.store(true, Ordering::SeqCst);
    let config = test_config(false);
    let result = startup::preflight(config.flags, &store).await;
    assert!(matches!(result, Err(StartupError::DatabaseUnreachable(_))));
}

#[tokio::test]
async fn startup_succeeds_against_reachable_store() {
    let store = InMemoryStore::default();
    let config = test_config(false);
    assert!(startup::preflight(config.flags, &store).await.is_ok());
}
