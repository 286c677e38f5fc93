//! Booking transaction orchestrator.
//!
//! [`PgBookingStore::place_booking`] composes the voucher ledger, the
//! loyalty ledger and the booking insert into one atomic unit: either
//! every effect is visible (booking row, consumed redemption, credited
//! points) or none is. An external reader sees the pre-transaction
//! state or the fully-applied state, never anything in between.

use crate::{loyalty, storage};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use staybook_core::loyalty::{apply_discount, earned_points};
use staybook_core::types::{Booking, BookingId, HotelId, PlaceBooking, RedemptionId, UserId};
use staybook_core::validate::check_stay;
use staybook_core::{Error, Result};
use tracing::info;
use uuid::Uuid;

/// PostgreSQL-backed bookings and the transaction that creates them.
#[derive(Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    /// Creates a store over the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a booking, consuming an optional voucher redemption and
    /// crediting earned loyalty points, in one transaction.
    ///
    /// Steps, all inside a single transaction on one pooled connection:
    ///
    /// 1. Load the hotel's nightly rate; the total is derived here, never
    ///    taken from the client.
    /// 2. If a redemption was supplied, lock the row with
    ///    `SELECT ... FOR UPDATE` while checking `(owner, unused)`, apply
    ///    the voucher's discount and flip `is_used`. Concurrent attempts
    ///    to consume the same redemption queue on the row lock and find
    ///    `is_used = true` once it is their turn.
    /// 3. Insert the booking row.
    /// 4. Credit `floor(total / 10_000)` points when positive.
    /// 5. Commit. Any earlier failure drops the transaction handle,
    ///    which rolls back every write: the booking does not exist, the
    ///    redemption stays unused, the balance is unchanged.
    ///
    /// The confirmation e-mail is deliberately not sent here: callers
    /// notify after this function returns, so the transaction is never
    /// held open across a network call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an inverted or over-long stay,
    /// a room count outside the accepted range, or a total that does not
    /// fit in 64 bits, [`Error::NotFound`] if the hotel does not exist,
    /// [`Error::VoucherInvalid`] if the redemption is missing, owned by
    /// someone else, or already consumed, [`Error::Storage`] on any
    /// query fault.
    pub async fn place_booking(&self, cmd: &PlaceBooking) -> Result<Booking> {
        check_stay(cmd.check_in, cmd.check_out, cmd.rooms)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage("Failed to start transaction", e))?;

        // Step 1: price the stay from the catalog.
        let price_per_night = sqlx::query_scalar::<_, i64>(
            "SELECT price_per_night FROM hotels WHERE id = $1",
        )
        .bind(cmd.hotel_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| storage("Failed to load hotel rate", e))?
        .ok_or(Error::NotFound("hotel"))?;

        // `check_stay` bounds both factors, but the nightly rate is
        // admin-controlled, so the product is still computed checked.
        let mut total_price = price_per_night
            .checked_mul(cmd.nights())
            .and_then(|t| t.checked_mul(i64::from(cmd.rooms)))
            .ok_or_else(|| Error::Validation("total price out of range".into()))?;

        // Step 2: consume the voucher redemption under a row lock.
        if let Some(redemption_id) = cmd.redemption_id {
            let discount = sqlx::query_scalar::<_, i64>(
                "SELECT v.discount
                 FROM voucher_redemptions vr
                 JOIN vouchers v ON v.id = vr.voucher_id
                 WHERE vr.id = $1 AND vr.user_id = $2 AND NOT vr.is_used
                 FOR UPDATE OF vr",
            )
            .bind(redemption_id.as_uuid())
            .bind(cmd.user_id.as_uuid())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| storage("Failed to lock redemption", e))?
            .ok_or(Error::VoucherInvalid)?;

            sqlx::query("UPDATE voucher_redemptions SET is_used = TRUE WHERE id = $1")
                .bind(redemption_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(|e| storage("Failed to consume redemption", e))?;

            total_price = apply_discount(total_price, discount);
        }

        // Step 3: the booking row itself.
        let earned = earned_points(total_price);
        let booking_id = BookingId::new();
        let created_at: DateTime<Utc> = sqlx::query_scalar(
            "INSERT INTO bookings
                 (id, user_id, hotel_id, check_in, check_out, rooms,
                  total_price, earned_points, redemption_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING created_at",
        )
        .bind(booking_id.as_uuid())
        .bind(cmd.user_id.as_uuid())
        .bind(cmd.hotel_id.as_uuid())
        .bind(cmd.check_in)
        .bind(cmd.check_out)
        .bind(cmd.rooms)
        .bind(total_price)
        .bind(earned)
        .bind(cmd.redemption_id.as_ref().map(RedemptionId::as_uuid))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| storage("Failed to insert booking", e))?;

        // Step 4: loyalty credit.
        if earned > 0 {
            loyalty::credit_points(&mut *tx, cmd.user_id, earned).await?;
        }

        // Step 5: make it all visible at once.
        tx.commit()
            .await
            .map_err(|e| storage("Failed to commit booking", e))?;

        info!(
            booking_id = %booking_id,
            user_id = %cmd.user_id,
            hotel_id = %cmd.hotel_id,
            total_price,
            earned,
            voucher_applied = cmd.redemption_id.is_some(),
            "Booking placed"
        );

        Ok(Booking {
            id: booking_id,
            user_id: cmd.user_id,
            hotel_id: cmd.hotel_id,
            check_in: cmd.check_in,
            check_out: cmd.check_out,
            rooms: cmd.rooms,
            total_price,
            earned_points: earned,
            redemption_id: cmd.redemption_id,
            created_at,
        })
    }

    /// Gets one booking.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such booking exists,
    /// [`Error::Storage`] on query fault.
    pub async fn get_booking(&self, booking_id: BookingId) -> Result<Booking> {
        let row = sqlx::query(
            "SELECT id, user_id, hotel_id, check_in, check_out, rooms,
                    total_price, earned_points, redemption_id, created_at
             FROM bookings
             WHERE id = $1",
        )
        .bind(booking_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage("Failed to get booking", e))?
        .ok_or(Error::NotFound("booking"))?;

        booking_from_row(&row)
    }

    /// Lists a user's bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            "SELECT id, user_id, hotel_id, check_in, check_out, rooms,
                    total_price, earned_points, redemption_id, created_at
             FROM bookings
             WHERE user_id = $1
             ORDER BY created_at DESC",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to list bookings", e))?;

        rows.iter().map(booking_from_row).collect()
    }

    /// Lists every booking, newest first (admin surface).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn list_all(&self) -> Result<Vec<Booking>> {
        let rows = sqlx::query(
            "SELECT id, user_id, hotel_id, check_in, check_out, rooms,
                    total_price, earned_points, redemption_id, created_at
             FROM bookings
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to list bookings", e))?;

        rows.iter().map(booking_from_row).collect()
    }

    /// Deletes a booking (admin surface). The consumed redemption, if
    /// any, stays used: deleting a booking is bookkeeping, not a refund.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such booking exists,
    /// [`Error::Storage`] on query fault.
    pub async fn delete_booking(&self, booking_id: BookingId) -> Result<()> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(booking_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage("Failed to delete booking", e))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("booking"));
        }

        Ok(())
    }
}

fn booking_from_row(row: &PgRow) -> Result<Booking> {
    let id: Uuid = row.try_get("id").map_err(|e| storage("Bad booking row", e))?;
    let user_id: Uuid = row
        .try_get("user_id")
        .map_err(|e| storage("Bad booking row", e))?;
    let hotel_id: Uuid = row
        .try_get("hotel_id")
        .map_err(|e| storage("Bad booking row", e))?;
    let redemption_id: Option<Uuid> = row
        .try_get("redemption_id")
        .map_err(|e| storage("Bad booking row", e))?;
    let check_in: NaiveDate = row
        .try_get("check_in")
        .map_err(|e| storage("Bad booking row", e))?;
    let check_out: NaiveDate = row
        .try_get("check_out")
        .map_err(|e| storage("Bad booking row", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| storage("Bad booking row", e))?;

    Ok(Booking {
        id: BookingId::from_uuid(id),
        user_id: UserId::from_uuid(user_id),
        hotel_id: HotelId::from_uuid(hotel_id),
        check_in,
        check_out,
        rooms: row
            .try_get("rooms")
            .map_err(|e| storage("Bad booking row", e))?,
        total_price: row
            .try_get("total_price")
            .map_err(|e| storage("Bad booking row", e))?,
        earned_points: row
            .try_get("earned_points")
            .map_err(|e| storage("Bad booking row", e))?,
        redemption_id: redemption_id.map(RedemptionId::from_uuid),
        created_at,
    })
}
