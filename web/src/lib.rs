//! Axum HTTP layer for the Staybook booking platform.
//!
//! This crate is the imperative shell around `staybook-core` and
//! `staybook-postgres`: it parses requests, authenticates the caller,
//! invokes the persistence layer, and serializes responses. All money
//! amounts are derived server-side; handlers never accept a price from
//! the client.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Authenticate** via the `SessionUser` / `RequireAdmin` extractors
//! 3. **Validate** the payload with `staybook_core::validate`
//! 4. **Execute** the operation against `staybook-postgres`
//! 5. **Map** domain errors to HTTP responses through `AppError`

pub mod auth;
pub mod error;
pub mod handlers;
pub mod mailer;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use auth::{RequireAdmin, SessionUser};
pub use error::AppError;
pub use mailer::{ConsoleMailer, Mailer, SmtpMailer};
pub use router::app_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
