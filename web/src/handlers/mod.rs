//! HTTP request handlers.
//!
//! Handlers authenticate through the extractors in [`crate::auth`],
//! validate with `staybook_core::validate`, and delegate all state
//! changes to `staybook-postgres`.

pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod health;
pub mod hotels;
pub mod uploads;
pub mod vouchers;
