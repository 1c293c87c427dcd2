//! Connection pool construction and validated session checkout.

use sqlx::postgres::{PgPoolOptions, Postgres};
use sqlx::pool::PoolConnection;
use sqlx::PgPool;

use crate::config::{
    DbConfig, DB_ACQUIRE_MAX_ATTEMPTS, DB_ACQUIRE_RETRY_DELAY, DB_POOL_MAX_CONNECTIONS,
    DB_PROBE_QUERY, DB_STATEMENT_TIMEOUT_MS,
};
use crate::error::AppError;
use crate::retry;

/// Builds the Postgres pool. Connections are established lazily; startup
/// reachability is verified separately by the startup sequencer.
pub fn connect(db: &DbConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(DB_POOL_MAX_CONNECTIONS)
        .connect_lazy(&db.url())
}

/// Checks out a database session, validating it with the trivial probe query
/// before handing it to the caller.
///
/// Retries up to the fixed budget with a fixed sleep between attempts; a
/// session that fails the probe is discarded, not reused. The final attempt's
/// failure propagates as [`AppError::Connectivity`]. Dropping the returned
/// guard releases the session back to the pool on every exit path.
pub async fn acquire_session(pool: &PgPool) -> Result<PoolConnection<Postgres>, AppError> {
    retry::with_fixed_backoff(DB_ACQUIRE_MAX_ATTEMPTS, DB_ACQUIRE_RETRY_DELAY, || {
        let pool = pool.clone();
        async move {
            let mut conn = pool.acquire().await?;
            sqlx::query(DB_PROBE_QUERY).execute(&mut *conn).await?;
            Ok::<_, sqlx::Error>(conn)
        }
    })
    .await
    .map_err(AppError::Connectivity)
}

/// Applies the per-statement execution timeout to the session. Covers the
/// probe, the status-log insert, and the read-back query alike.
pub async fn set_statement_timeout(
    conn: &mut PoolConnection<Postgres>,
) -> Result<(), sqlx::Error> {
    let stmt = format!("SET statement_timeout = {DB_STATEMENT_TIMEOUT_MS}");
    sqlx::query(&stmt).execute(&mut **conn).await?;
    Ok(())
}
