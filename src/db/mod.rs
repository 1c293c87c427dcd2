//! Database access: pool management, session acquisition, and the status
//! log store.
//!
//! The Postgres engine itself is treated as a black-box storage service
//! reached over a connection pool. Sessions are never shared across
//! concurrent requests; each caller checks one out, uses it, and the pool
//! guard returns it on drop regardless of exit path.

pub mod models;
pub mod pool;
pub mod store;

pub use models::ConnectionLogEntry;
pub use store::{PgStatusStore, StatusStore};
