//! uplog: a connectivity status logging backend.
//!
//! Answers liveness probes against a Postgres dependency and records
//! client-submitted connectivity entries, returning the most recent entries
//! on each write. The binary in `main.rs` wires configuration, the database
//! pool, startup checks, and the Axum router together.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod health;
pub mod metrics;
pub mod middleware;
pub mod retry;
pub mod routes;
pub mod startup;
pub mod state;
