//! uplog: a connectivity status logging backend.
//!
//! This is the application entry point. It initializes tracing, loads
//! configuration from the environment, builds the Postgres pool, runs the
//! one-shot startup checks, sets up the Axum router, and starts the HTTP
//! server with graceful shutdown on SIGTERM/Ctrl+C.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uplog::clock::CivilClock;
use uplog::config::{AppConfig, DEFAULT_LOG_FILTER};
use uplog::db::{pool, PgStatusStore};
use uplog::routes::create_router;
use uplog::startup;
use uplog::state::AppState;

/// uplog: connectivity status logging backend
#[derive(Parser, Debug)]
#[command(name = "uplog", version, about)]
struct Args {
    /// Log level filter (e.g., "uplog=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load .env (if present) and typed configuration
    dotenv::dotenv().ok();
    let config = AppConfig::from_env()?;
    tracing::info!(
        db_host = %config.db.host,
        db_port = config.db.port,
        db_name = %config.db.name,
        simulate_outage = config.flags.simulate_outage,
        simulate_crash = config.flags.simulate_crash,
        "Loaded configuration"
    );

    // Build the connection pool and store
    let pg_pool = pool::connect(&config.db)?;
    let store = PgStatusStore::new(pg_pool);

    // One-shot startup checks: crash simulation, then database reachability.
    // Failure here is fatal; the process exits without serving.
    startup::preflight(config.flags, &store).await?;
    store.ensure_schema().await?;

    // Create application state
    let addr: SocketAddr = format!("{}:{}", config.http.host, config.http.port)
        .parse()
        .expect("Invalid HTTP_HOST or HTTP_PORT in config");
    let state = AppState::new(config, Arc::new(store), Arc::new(CivilClock::new()));

    // Create router
    let app = create_router(state);

    // Start server
    tracing::info!("Starting server at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Resolves when SIGTERM or Ctrl+C is received, triggering connection
/// draining in `axum::serve`.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
