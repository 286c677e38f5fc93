//! Error taxonomy shared across the Staybook crates.

use thiserror::Error;

/// Result type alias for domain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure modes of the booking platform, organized by category.
///
/// Business-rule failures are expected, carry a client-facing message
/// and never leave partial writes behind (the enclosing transaction is
/// rolled back). Storage faults are logged server-side and surfaced to
/// clients as an opaque failure. Nothing is retried automatically.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════
    // Input Validation
    // ═══════════════════════════════════════════════════════════

    /// Malformed or missing input, rejected before any transaction starts.
    #[error("Validation failed: {0}")]
    Validation(String),

    // ═══════════════════════════════════════════════════════════
    // Business Rules
    // ═══════════════════════════════════════════════════════════

    /// Voucher redemption missing, owned by another user, or already consumed.
    #[error("Voucher is invalid or already used")]
    VoucherInvalid,

    /// Point balance does not cover the voucher's cost.
    #[error("Insufficient points: {required} required, {available} available")]
    InsufficientPoints {
        /// Point cost of the voucher.
        required: i64,
        /// The user's balance at the time of the attempt.
        available: i64,
    },

    /// Requested entity does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Email address is already registered.
    #[error("Email is already registered")]
    EmailTaken,

    // ═══════════════════════════════════════════════════════════
    // Authentication / Authorization
    // ═══════════════════════════════════════════════════════════

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bearer token does not match any session.
    #[error("Session not found")]
    SessionNotFound,

    /// Session exists but its expiry has passed.
    #[error("Session has expired")]
    SessionExpired,

    /// Authenticated, but the capability check failed.
    #[error("Insufficient permissions")]
    Forbidden,

    // ═══════════════════════════════════════════════════════════
    // Infrastructure
    // ═══════════════════════════════════════════════════════════

    /// Connection or query fault. Message is for logs, not clients.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Notification e-mail could not be delivered.
    #[error("Failed to send email")]
    EmailDelivery,
}

impl Error {
    /// Returns `true` if this error is an expected business-rule or
    /// input failure whose message is safe to show to the caller.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::EmailDelivery)
    }

    /// Returns `true` if this error means the request lacked a valid
    /// credential (as opposed to lacking permission).
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials | Self::SessionNotFound | Self::SessionExpired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_failures_are_user_errors() {
        assert!(Error::VoucherInvalid.is_user_error());
        assert!(
            Error::InsufficientPoints {
                required: 450,
                available: 100
            }
            .is_user_error()
        );
        assert!(Error::Validation("rooms must be >= 1".into()).is_user_error());
    }

    #[test]
    fn storage_faults_are_opaque() {
        assert!(!Error::Storage("connection reset".into()).is_user_error());
        assert!(!Error::EmailDelivery.is_user_error());
    }

    #[test]
    fn auth_classification() {
        assert!(Error::SessionExpired.is_auth_error());
        assert!(Error::InvalidCredentials.is_auth_error());
        assert!(!Error::Forbidden.is_auth_error());
    }

    #[test]
    fn insufficient_points_message_names_both_sides() {
        let err = Error::InsufficientPoints {
            required: 450,
            available: 100,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient points: 450 required, 100 available"
        );
    }
}
