//! Shared application state for web handlers.

use crate::mailer::Mailer;
use staybook_core::config::{AuthConfig, UploadConfig};
use staybook_postgres::{
    PgBookingStore, PgDashboard, PgHotelCatalog, PgPool, PgSessionStore, PgUserRepository,
    PgVoucherLedger,
};
use std::sync::Arc;

/// Application state shared across all handlers.
///
/// Every store is a thin `Clone` wrapper around the same connection pool,
/// so cloning the state per request is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Raw pool, used by the readiness probe.
    pub pool: PgPool,
    /// User accounts and point balances.
    pub users: PgUserRepository,
    /// Bearer-token sessions.
    pub sessions: PgSessionStore,
    /// Hotel catalog.
    pub hotels: PgHotelCatalog,
    /// Voucher catalog and redemptions.
    pub vouchers: PgVoucherLedger,
    /// Booking transactions.
    pub bookings: PgBookingStore,
    /// Admin dashboard aggregates.
    pub dashboard: PgDashboard,
    /// Booking-confirmation mailer.
    pub mailer: Arc<dyn Mailer>,
    /// Session TTL settings.
    pub auth: AuthConfig,
    /// Upload directory and size cap.
    pub uploads: UploadConfig,
}

impl AppState {
    /// Assemble the state from a connection pool, a mailer, and config.
    #[must_use]
    pub fn new(
        pool: PgPool,
        mailer: Arc<dyn Mailer>,
        auth: AuthConfig,
        uploads: UploadConfig,
    ) -> Self {
        Self {
            users: PgUserRepository::new(pool.clone()),
            sessions: PgSessionStore::new(pool.clone()),
            hotels: PgHotelCatalog::new(pool.clone()),
            vouchers: PgVoucherLedger::new(pool.clone()),
            bookings: PgBookingStore::new(pool.clone()),
            dashboard: PgDashboard::new(pool.clone()),
            pool,
            mailer,
            auth,
            uploads,
        }
    }
}
