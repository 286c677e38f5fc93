//! Hotel catalog handlers.
//!
//! Browsing is public; mutations are admin-only via [`RequireAdmin`].

use crate::auth::RequireAdmin;
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use staybook_core::types::{Hotel, HotelDraft, HotelId};
use uuid::Uuid;

/// Listing filters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HotelListQuery {
    /// Case-insensitive city filter.
    pub city: Option<String>,
}

/// List the catalog, optionally filtered by city.
///
/// # Endpoint
///
/// `GET /api/hotels?city=Denpasar`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<HotelListQuery>,
) -> Result<Json<Vec<Hotel>>, AppError> {
    let hotels = state.hotels.list_hotels(query.city.as_deref()).await?;
    Ok(Json(hotels))
}

/// Fetch one hotel.
///
/// # Endpoint
///
/// `GET /api/hotels/:id`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Hotel>, AppError> {
    let hotel = state.hotels.get_hotel(HotelId::from_uuid(id)).await?;
    Ok(Json(hotel))
}

/// Add a hotel to the catalog (admin).
///
/// # Endpoint
///
/// `POST /api/hotels`
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(draft): Json<HotelDraft>,
) -> Result<(StatusCode, Json<Hotel>), AppError> {
    check_draft(&draft)?;
    let hotel = state.hotels.create_hotel(&draft).await?;

    tracing::info!(hotel_id = %hotel.id, admin = %admin.user.id, "Hotel created");
    Ok((StatusCode::CREATED, Json(hotel)))
}

/// Replace a hotel's catalog entry (admin).
///
/// # Endpoint
///
/// `PUT /api/hotels/:id`
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
    Json(draft): Json<HotelDraft>,
) -> Result<Json<Hotel>, AppError> {
    check_draft(&draft)?;
    let hotel = state
        .hotels
        .update_hotel(HotelId::from_uuid(id), &draft)
        .await?;

    tracing::info!(hotel_id = %hotel.id, admin = %admin.user.id, "Hotel updated");
    Ok(Json(hotel))
}

/// Remove a hotel from the catalog (admin).
///
/// # Endpoint
///
/// `DELETE /api/hotels/:id`
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.hotels.delete_hotel(HotelId::from_uuid(id)).await?;

    tracing::info!(hotel_id = %id, admin = %admin.user.id, "Hotel deleted");
    Ok(StatusCode::NO_CONTENT)
}

fn check_draft(draft: &HotelDraft) -> Result<(), AppError> {
    if draft.name.trim().is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    if draft.city.trim().is_empty() {
        return Err(AppError::validation("city must not be empty"));
    }
    if draft.price_per_night < 0 {
        return Err(AppError::validation("price_per_night must not be negative"));
    }
    if !(1..=5).contains(&draft.rating) {
        return Err(AppError::validation("rating must be between 1 and 5"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> HotelDraft {
        HotelDraft {
            name: "Test Hotel".to_string(),
            city: "Denpasar".to_string(),
            description: String::new(),
            address: "Jalan Test 1".to_string(),
            price_per_night: 100_000,
            rating: 4,
            image_url: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn valid_draft_passes() {
        assert!(check_draft(&draft()).is_ok());
    }

    #[test]
    fn rating_is_bounded() {
        let mut d = draft();
        d.rating = 0;
        assert!(check_draft(&d).is_err());
        d.rating = 6;
        assert!(check_draft(&d).is_err());
    }

    #[test]
    fn negative_price_is_rejected() {
        let mut d = draft();
        d.price_per_night = -1;
        assert!(check_draft(&d).is_err());
    }
}
