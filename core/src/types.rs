//! Domain entities and identifiers for the booking platform.
//!
//! Identifiers are newtypes over [`Uuid`] so a booking id can never be
//! passed where a hotel id is expected.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing `Uuid`.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Gets the inner UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id! {
    /// Unique identifier for a user account.
    UserId
}

entity_id! {
    /// Unique identifier for a hotel.
    HotelId
}

entity_id! {
    /// Unique identifier for a booking.
    BookingId
}

entity_id! {
    /// Unique identifier for a voucher definition in the catalog.
    VoucherId
}

entity_id! {
    /// Unique identifier for a voucher redemption granted to a user.
    RedemptionId
}

entity_id! {
    /// Unique identifier for an authenticated session.
    SessionId
}

// ============================================================================
// Users and sessions
// ============================================================================

/// Account role. Checked once at the HTTP boundary, not per-handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular consumer account.
    User,
    /// Back-office administrator.
    Admin,
}

impl Role {
    /// Database representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Parses the database representation.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// A registered account with its loyalty-point balance.
///
/// `points` is maintained by the loyalty ledger and never goes negative
/// (enforced both here and by a database CHECK constraint).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Account identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique per account.
    pub email: String,
    /// Argon2 password hash. Never serialized into responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// Loyalty-point balance, always `>= 0`.
    pub points: i64,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Server-side session backing a bearer token.
///
/// Only the SHA-256 digest of the token is stored; the token itself is
/// handed to the client once at login and never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    /// Session identifier.
    pub id: SessionId,
    /// The account this session authenticates.
    pub user_id: UserId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Hard expiry; sessions are not refreshed.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Returns `true` if the session's expiry has passed.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

// ============================================================================
// Hotels
// ============================================================================

/// A bookable hotel in the catalog. Read-mostly, admin-mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hotel {
    /// Hotel identifier.
    pub id: HotelId,
    /// Hotel name.
    pub name: String,
    /// City used for listing filters.
    pub city: String,
    /// Marketing description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// Price per room-night in integer minor units.
    pub price_per_night: i64,
    /// Star rating, 1–5.
    pub rating: i16,
    /// Catalog image, served from the uploads directory.
    pub image_url: Option<String>,
    /// Latitude of the property.
    pub latitude: Option<f64>,
    /// Longitude of the property.
    pub longitude: Option<f64>,
    /// Catalog insertion timestamp.
    pub created_at: DateTime<Utc>,
}

/// Fields of a hotel as supplied by an admin create or update request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HotelDraft {
    /// Hotel name.
    pub name: String,
    /// City used for listing filters.
    pub city: String,
    /// Marketing description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// Price per room-night in integer minor units.
    pub price_per_night: i64,
    /// Star rating, 1–5.
    pub rating: i16,
    /// Catalog image.
    pub image_url: Option<String>,
    /// Latitude of the property.
    pub latitude: Option<f64>,
    /// Longitude of the property.
    pub longitude: Option<f64>,
}

// ============================================================================
// Bookings
// ============================================================================

/// A confirmed stay. Created atomically with the loyalty-point credit;
/// immutable afterwards except for admin deletion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier.
    pub id: BookingId,
    /// Owning user.
    pub user_id: UserId,
    /// Booked hotel.
    pub hotel_id: HotelId,
    /// First night of the stay.
    pub check_in: NaiveDate,
    /// Check-out date, always after `check_in`.
    pub check_out: NaiveDate,
    /// Number of rooms, always `>= 1`.
    pub rooms: i32,
    /// Total charged, in integer minor units, after any voucher discount.
    pub total_price: i64,
    /// Loyalty points credited for this booking.
    pub earned_points: i64,
    /// Voucher redemption consumed by this booking, if any.
    pub redemption_id: Option<RedemptionId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Command to create a booking, assembled by the HTTP layer from the
/// authenticated session and the validated request body.
///
/// The total price is deliberately absent: money is derived server-side
/// from the hotel's rate inside the booking transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaceBooking {
    /// Acting user, taken from the session, never from the payload.
    pub user_id: UserId,
    /// Hotel to book.
    pub hotel_id: HotelId,
    /// First night.
    pub check_in: NaiveDate,
    /// Check-out date.
    pub check_out: NaiveDate,
    /// Rooms requested.
    pub rooms: i32,
    /// Voucher redemption to consume, if the user applied one.
    pub redemption_id: Option<RedemptionId>,
}

impl PlaceBooking {
    /// Number of nights of the stay.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

// ============================================================================
// Vouchers
// ============================================================================

/// A voucher definition in the static, admin-managed catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoucherDefinition {
    /// Voucher identifier.
    pub id: VoucherId,
    /// Unique promotional code.
    pub code: String,
    /// Description shown in the catalog.
    pub description: String,
    /// Discount applied to a booking's total, in integer minor units.
    pub discount: i64,
    /// Loyalty-point cost to redeem.
    pub point_cost: i64,
    /// Catalog image.
    pub image_url: Option<String>,
}

/// Fields of a voucher definition as supplied by an admin create request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoucherDraft {
    /// Unique promotional code.
    pub code: String,
    /// Description shown in the catalog.
    pub description: String,
    /// Discount applied to a booking's total, in integer minor units.
    pub discount: i64,
    /// Loyalty-point cost to redeem.
    pub point_cost: i64,
    /// Catalog image.
    pub image_url: Option<String>,
}

/// A voucher instance granted to a specific user, consumable by at most
/// one booking.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoucherRedemption {
    /// Redemption identifier.
    pub id: RedemptionId,
    /// Owning user.
    pub user_id: UserId,
    /// The redeemed voucher definition.
    pub voucher_id: VoucherId,
    /// Set to `true` exactly once, when a booking consumes it.
    pub is_used: bool,
    /// When the user redeemed the voucher.
    pub redeemed_at: DateTime<Utc>,
}

/// Outcome of a successful voucher redemption.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RedemptionReceipt {
    /// The newly granted, unused redemption.
    pub redemption: VoucherRedemption,
    /// The user's point balance after the debit.
    pub balance: i64,
}

// ============================================================================
// Dashboard
// ============================================================================

/// Admin dashboard aggregates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// Registered accounts.
    pub user_count: i64,
    /// Hotels in the catalog.
    pub hotel_count: i64,
    /// Bookings ever created.
    pub booking_count: i64,
    /// Sum of booking totals, in integer minor units.
    pub total_revenue: i64,
    /// Booking counts per calendar month, most recent last.
    pub bookings_per_month: Vec<MonthlyCount>,
    /// Hotels ranked by booking count.
    pub top_hotels: Vec<HotelBookingCount>,
}

/// Bookings created in one calendar month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlyCount {
    /// First day of the month.
    pub month: NaiveDate,
    /// Bookings created in that month.
    pub count: i64,
}

/// Booking count for one hotel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HotelBookingCount {
    /// Hotel identifier.
    pub hotel_id: HotelId,
    /// Hotel name at query time.
    pub name: String,
    /// Bookings referencing the hotel.
    pub count: i64,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)] // Test code can unwrap

    use super::*;

    #[test]
    fn ids_are_distinct_types_with_stable_display() {
        let uuid = Uuid::new_v4();
        let user = UserId::from_uuid(uuid);
        assert_eq!(user.to_string(), uuid.to_string());
        assert_eq!(user.as_uuid(), &uuid);
    }

    #[test]
    fn role_round_trips_through_db_representation() {
        assert_eq!(Role::parse(Role::Admin.as_str()), Some(Role::Admin));
        assert_eq!(Role::parse(Role::User.as_str()), Some(Role::User));
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn password_hash_never_serializes() {
        let user = User {
            id: UserId::new(),
            name: "Ayu".into(),
            email: "ayu@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::User,
            points: 120,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("ayu@example.com"));
    }

    #[test]
    fn session_expiry_is_inclusive() {
        let now = Utc::now();
        let session = Session {
            id: SessionId::new(),
            user_id: UserId::new(),
            created_at: now,
            expires_at: now,
        };
        assert!(session.is_expired(now));
        assert!(!session.is_expired(now - chrono::Duration::seconds(1)));
    }

    #[test]
    fn nights_counts_calendar_days() {
        let cmd = PlaceBooking {
            user_id: UserId::new(),
            hotel_id: HotelId::new(),
            check_in: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 3, 13).unwrap(),
            rooms: 2,
            redemption_id: None,
        };
        assert_eq!(cmd.nights(), 3);
    }
}
