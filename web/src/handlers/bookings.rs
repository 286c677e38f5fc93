//! Booking handlers.
//!
//! The create handler validates the stay before any transaction, runs
//! the atomic booking transaction, and only after commit hands the
//! confirmation email to a detached task. Mailer failures are logged
//! and never affect the booking.

use crate::auth::{RequireAdmin, SessionUser};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;
use staybook_core::types::{Booking, BookingId, HotelId, PlaceBooking, RedemptionId, Role};
use staybook_core::validate;
use uuid::Uuid;

/// Request to book a stay.
///
/// There is no price field: money is derived server-side from the
/// hotel's rate inside the booking transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// Hotel to book.
    pub hotel_id: Uuid,
    /// First night of the stay.
    pub check_in: NaiveDate,
    /// Check-out date.
    pub check_out: NaiveDate,
    /// Rooms requested.
    pub rooms: i32,
    /// Voucher redemption to apply, if any.
    pub redemption_id: Option<Uuid>,
}

/// Book a stay for the authenticated user.
///
/// # Endpoint
///
/// `POST /api/bookings` with a bearer token.
pub async fn create(
    State(state): State<AppState>,
    caller: SessionUser,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    // Reject bad input before acquiring a connection.
    validate::check_stay(request.check_in, request.check_out, request.rooms)?;

    let cmd = PlaceBooking {
        user_id: caller.user.id,
        hotel_id: HotelId::from_uuid(request.hotel_id),
        check_in: request.check_in,
        check_out: request.check_out,
        rooms: request.rooms,
        redemption_id: request.redemption_id.map(RedemptionId::from_uuid),
    };

    let booking = state.bookings.place_booking(&cmd).await?;

    tracing::info!(
        booking_id = %booking.id,
        user_id = %caller.user.id,
        total_price = booking.total_price,
        earned_points = booking.earned_points,
        "Booking placed"
    );

    send_confirmation(&state, &caller, booking.clone());

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Fire-and-forget confirmation email. Runs after commit on a detached
/// task; the send itself goes through the blocking pool because the
/// mailer is synchronous.
fn send_confirmation(state: &AppState, caller: &SessionUser, booking: Booking) {
    let hotels = state.hotels.clone();
    let mailer = state.mailer.clone();
    let to = caller.user.email.clone();
    let name = caller.user.name.clone();

    tokio::spawn(async move {
        let hotel_name = match hotels.get_hotel(booking.hotel_id).await {
            Ok(hotel) => hotel.name,
            Err(e) => {
                tracing::warn!(error = %e, booking_id = %booking.id, "Confirmation email skipped");
                return;
            }
        };

        let booking_id = booking.id;
        let result = tokio::task::spawn_blocking(move || {
            mailer.send_booking_confirmation(&to, &name, &booking, &hotel_name)
        })
        .await;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(error = %e, booking_id = %booking_id, "Confirmation email failed");
            }
            Err(e) => {
                tracing::warn!(error = %e, booking_id = %booking_id, "Confirmation task failed");
            }
        }
    });
}

/// List the caller's bookings.
///
/// # Endpoint
///
/// `GET /api/bookings`
pub async fn list_mine(
    State(state): State<AppState>,
    caller: SessionUser,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.bookings.list_for_user(caller.user.id).await?;
    Ok(Json(bookings))
}

/// Fetch one booking. Owners see their own; admins see any. Foreign
/// bookings are reported as missing rather than forbidden.
///
/// # Endpoint
///
/// `GET /api/bookings/:id`
pub async fn get(
    State(state): State<AppState>,
    caller: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.bookings.get_booking(BookingId::from_uuid(id)).await?;

    if booking.user_id != caller.user.id && caller.user.role != Role::Admin {
        return Err(AppError::not_found("booking"));
    }

    Ok(Json(booking))
}

/// List every booking (admin).
///
/// # Endpoint
///
/// `GET /api/admin/bookings`
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = state.bookings.list_all().await?;
    Ok(Json(bookings))
}

/// Delete a booking (admin). Consumed redemptions stay consumed.
///
/// # Endpoint
///
/// `DELETE /api/bookings/:id`
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .bookings
        .delete_booking(BookingId::from_uuid(id))
        .await?;

    tracing::info!(booking_id = %id, admin = %admin.user.id, "Booking deleted");
    Ok(StatusCode::NO_CONTENT)
}
