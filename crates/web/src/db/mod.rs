//! Database operations for the order desk.
//!
//! # Tables
//!
//! - `users` - Staff accounts (employees and logists)
//! - `drivers` - Drivers orders can be assigned to
//! - `orders` - Shipment orders
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p hrom-cli -- migrate
//! ```

pub mod drivers;
pub mod orders;
pub mod reports;
pub mod users;

pub use drivers::DriverRepository;
pub use orders::OrderRepository;
pub use reports::ReportRepository;
pub use users::UserRepository;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use thiserror::Error;

use crate::config::DatabaseConfig;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username or tracking number).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
    pub(crate) fn from_unique_violation(e: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(format!("{what} already exists"));
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool from configuration.
///
/// Connections are recycled after `recycle` and, when `pre_ping` is set,
/// checked with a round-trip before being handed out.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(2.min(config.max_connections))
        .acquire_timeout(Duration::from_secs(10))
        .max_lifetime(config.recycle)
        .test_before_acquire(config.pre_ping)
        .connect(config.url.expose_secret())
        .await
}
