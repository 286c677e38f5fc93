//! Input validation helpers.
//!
//! Validation happens at the HTTP boundary, before any transaction is
//! started; a request that fails here never touches the database.

use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Maximum rooms in a single booking.
pub const MAX_ROOMS: i32 = 50;

/// Maximum stay length in nights.
pub const MAX_STAY_NIGHTS: i64 = 365;

/// Validate email address format.
///
/// Basic structural checks only: exactly one `@`, non-empty local and
/// domain parts, a dotted domain, and a sane length. Full RFC 5322
/// compliance is out of scope.
///
/// # Examples
///
/// ```
/// use staybook_core::validate::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(is_valid_email("user+tag@subdomain.example.com"));
/// assert!(!is_valid_email("invalid"));
/// assert!(!is_valid_email("@example.com"));
/// assert!(!is_valid_email("user@"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 255 {
        return false;
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }

    let local = parts[0];
    let domain = parts[1];

    if local.is_empty() || domain.is_empty() {
        return false;
    }

    if !domain.contains('.') {
        return false;
    }

    let valid_local = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');

    if !local.chars().all(valid_local) || !domain.chars().all(valid_domain) {
        return false;
    }

    domain.split('.').all(|part| !part.is_empty())
}

/// Checks the fields of a registration request.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the offending field.
pub fn check_registration(name: &str, email: &str, password: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation("name must not be empty".into()));
    }
    if !is_valid_email(email) {
        return Err(Error::Validation("email address is not valid".into()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(Error::Validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Checks a requested stay before the booking transaction starts.
///
/// Both factors of the total price are bounded here, so the pricing
/// arithmetic downstream operates on small, known ranges.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the date range is inverted or empty,
/// the stay exceeds [`MAX_STAY_NIGHTS`], or the room count is outside
/// `1..=MAX_ROOMS`.
pub fn check_stay(check_in: NaiveDate, check_out: NaiveDate, rooms: i32) -> Result<()> {
    if check_in >= check_out {
        return Err(Error::Validation(
            "check-out must be after check-in".into(),
        ));
    }
    if (check_out - check_in).num_days() > MAX_STAY_NIGHTS {
        return Err(Error::Validation(format!(
            "stay must not exceed {MAX_STAY_NIGHTS} nights"
        )));
    }
    if rooms < 1 {
        return Err(Error::Validation("at least one room is required".into()));
    }
    if rooms > MAX_ROOMS {
        return Err(Error::Validation(format!(
            "at most {MAX_ROOMS} rooms per booking"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn valid_emails() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name+tag@example.co.uk"));
        assert!(is_valid_email("a@b.c"));
    }

    #[test]
    fn invalid_emails() {
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b"));
    }

    #[test]
    fn registration_rejects_short_passwords() {
        let err = check_registration("Ayu", "ayu@example.com", "short").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(check_registration("Ayu", "ayu@example.com", "long enough").is_ok());
    }

    #[test]
    fn registration_rejects_blank_names() {
        let err = check_registration("   ", "ayu@example.com", "long enough").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn stay_rejects_inverted_and_empty_ranges() {
        assert!(check_stay(date(2025, 3, 12), date(2025, 3, 10), 1).is_err());
        assert!(check_stay(date(2025, 3, 10), date(2025, 3, 10), 1).is_err());
        assert!(check_stay(date(2025, 3, 10), date(2025, 3, 12), 1).is_ok());
    }

    #[test]
    fn stay_requires_a_room() {
        assert!(check_stay(date(2025, 3, 10), date(2025, 3, 12), 0).is_err());
    }

    #[test]
    fn stay_caps_the_room_count() {
        assert!(check_stay(date(2025, 3, 10), date(2025, 3, 12), MAX_ROOMS).is_ok());
        assert!(check_stay(date(2025, 3, 10), date(2025, 3, 12), MAX_ROOMS + 1).is_err());
        assert!(check_stay(date(2025, 3, 10), date(2025, 3, 12), i32::MAX).is_err());
    }

    #[test]
    fn stay_caps_the_number_of_nights() {
        let check_in = date(2026, 10, 1);
        assert!(check_stay(check_in, check_in + chrono::Days::new(365), 1).is_ok());
        assert!(check_stay(check_in, check_in + chrono::Days::new(366), 1).is_err());
        // A century-long stay with a huge room count used to overflow the
        // 64-bit total downstream; it must be rejected here instead.
        assert!(check_stay(check_in, date(2150, 10, 1), i32::MAX).is_err());
    }
}
