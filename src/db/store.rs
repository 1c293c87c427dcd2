//! The status log store: liveness probes and the write-then-read-back flow.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use sqlx::{Connection, PgPool};

use crate::config::{DB_PROBE_QUERY, RECENT_LOGS_LIMIT};
use crate::error::AppError;

use super::models::ConnectionLogEntry;
use super::pool::{acquire_session, set_statement_timeout};

/// Storage operations needed by the API surface.
///
/// Object-safe so handlers can run against an in-memory double in tests.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Runs the trivial probe query against a freshly validated session.
    async fn ping(&self) -> Result<(), AppError>;

    /// Persists one entry (insert + commit as one unit) and returns the most
    /// recent entries, newest first, capped at the configured limit.
    ///
    /// `checked_at` comes from the server-side clock, never the caller. On
    /// commit failure nothing is persisted and [`AppError::Persistence`]
    /// surfaces.
    async fn record_and_list(
        &self,
        status: &str,
        response_time_ms: f64,
        checked_at: DateTime<FixedOffset>,
    ) -> Result<Vec<ConnectionLogEntry>, AppError>;
}

/// Postgres-backed store over the shared connection pool.
#[derive(Clone)]
pub struct PgStatusStore {
    pool: PgPool,
}

impl PgStatusStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the append-only table and its descending-retrieval index if
    /// they do not exist yet. Idempotent; run once at startup.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS connection_logs (
                id SERIAL PRIMARY KEY,
                status TEXT NOT NULL,
                response_time_ms DOUBLE PRECISION NOT NULL,
                checked_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&mut *conn)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS connection_logs_checked_at_idx
             ON connection_logs (checked_at DESC)",
        )
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl StatusStore for PgStatusStore {
    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = acquire_session(&self.pool).await?;
        set_statement_timeout(&mut conn)
            .await
            .map_err(AppError::Connectivity)?;
        sqlx::query(DB_PROBE_QUERY)
            .execute(&mut *conn)
            .await
            .map_err(AppError::Connectivity)?;
        Ok(())
    }

    async fn record_and_list(
        &self,
        status: &str,
        response_time_ms: f64,
        checked_at: DateTime<FixedOffset>,
    ) -> Result<Vec<ConnectionLogEntry>, AppError> {
        let mut conn = acquire_session(&self.pool).await?;
        set_statement_timeout(&mut conn)
            .await
            .map_err(AppError::Connectivity)?;

        // Insert and commit as a single unit; a failed commit persists nothing.
        let mut tx = conn.begin().await.map_err(AppError::Persistence)?;
        sqlx::query(
            "INSERT INTO connection_logs (status, response_time_ms, checked_at)
             VALUES ($1, $2, $3)",
        )
        .bind(status)
        .bind(response_time_ms)
        .bind(checked_at)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Persistence)?;
        tx.commit().await.map_err(AppError::Persistence)?;

        let logs = sqlx::query_as::<_, ConnectionLogEntry>(
            "SELECT id, status, response_time_ms, checked_at
             FROM connection_logs
             ORDER BY checked_at DESC
             LIMIT $1",
        )
        .bind(RECENT_LOGS_LIMIT)
        .fetch_all(&mut *conn)
        .await
        .map_err(AppError::Connectivity)?;

        Ok(logs)
    }
}
