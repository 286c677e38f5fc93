//! PostgreSQL persistence gateway for Staybook.
//!
//! The database is the single source of truth: all multi-step mutations
//! (booking creation, voucher redemption) run inside one transaction on
//! a pooled connection, and contended rows (`users.points`,
//! `voucher_redemptions.is_used`) are taken with `SELECT ... FOR UPDATE`
//! so concurrent requests serialize at the storage boundary rather than
//! through any in-process coordination.
//!
//! # Example
//!
//! ```no_run
//! use staybook_core::Config;
//! use staybook_postgres::{connect, migrate};
//!
//! # async fn example() -> staybook_core::Result<()> {
//! let config = Config::from_env();
//! let pool = connect(&config.postgres).await?;
//! migrate(&pool).await?;
//! # Ok(())
//! # }
//! ```

pub mod bookings;
pub mod dashboard;
pub mod hotels;
pub mod loyalty;
pub mod sessions;
pub mod users;
pub mod vouchers;

pub use bookings::PgBookingStore;
pub use dashboard::PgDashboard;
pub use hotels::PgHotelCatalog;
pub use sessions::PgSessionStore;
pub use users::PgUserRepository;
pub use vouchers::PgVoucherLedger;

// Callers hold the pool through this alias so the web layer does not
// need its own sqlx dependency.
pub use sqlx::PgPool;

use sqlx::postgres::PgPoolOptions;
use staybook_core::config::PostgresConfig;
use staybook_core::{Error, Result};
use std::time::Duration;

/// Builds a connection pool from configuration.
///
/// # Errors
///
/// Returns [`Error::Storage`] if the database is unreachable.
pub async fn connect(config: &PostgresConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .idle_timeout(Duration::from_secs(config.idle_timeout))
        .connect(&config.url)
        .await
        .map_err(|e| Error::Storage(format!("Failed to connect to PostgreSQL: {e}")))
}

/// Builds a pool without establishing a connection, for tests and tools
/// that must construct application state before a database exists.
///
/// # Errors
///
/// Returns [`Error::Storage`] if the URL cannot be parsed.
pub fn connect_lazy(config: &PostgresConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout))
        .connect_lazy(&config.url)
        .map_err(|e| Error::Storage(format!("Invalid PostgreSQL URL: {e}")))
}

/// Runs the embedded schema migrations.
///
/// # Errors
///
/// Returns [`Error::Storage`] if a migration fails.
pub async fn migrate(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| Error::Storage(format!("Migration failed: {e}")))?;
    Ok(())
}

/// Readiness probe: a round-trip on a pooled connection.
///
/// # Errors
///
/// Returns [`Error::Storage`] if the pool cannot serve a query.
pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map_err(|e| Error::Storage(format!("Database ping failed: {e}")))?;
    Ok(())
}

pub(crate) fn storage(context: &str, e: sqlx::Error) -> Error {
    Error::Storage(format!("{context}: {e}"))
}
