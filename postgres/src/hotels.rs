//! PostgreSQL hotel catalog.

use crate::storage;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use staybook_core::types::{Hotel, HotelDraft, HotelId};
use staybook_core::{Error, Result};
use uuid::Uuid;

/// PostgreSQL-backed hotel catalog. Read-mostly, admin-mutated.
#[derive(Clone)]
pub struct PgHotelCatalog {
    pool: PgPool,
}

impl PgHotelCatalog {
    /// Creates a catalog over the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists hotels, optionally filtered by city (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn list_hotels(&self, city: Option<&str>) -> Result<Vec<Hotel>> {
        let rows = match city {
            Some(city) => {
                sqlx::query(
                    "SELECT id, name, city, description, address, price_per_night,
                            rating, image_url, latitude, longitude, created_at
                     FROM hotels
                     WHERE lower(city) = lower($1)
                     ORDER BY name",
                )
                .bind(city)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT id, name, city, description, address, price_per_night,
                            rating, image_url, latitude, longitude, created_at
                     FROM hotels
                     ORDER BY name",
                )
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| storage("Failed to list hotels", e))?;

        rows.iter().map(hotel_from_row).collect()
    }

    /// Gets one hotel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such hotel exists,
    /// [`Error::Storage`] on query fault.
    pub async fn get_hotel(&self, hotel_id: HotelId) -> Result<Hotel> {
        let row = sqlx::query(
            "SELECT id, name, city, description, address, price_per_night,
                    rating, image_url, latitude, longitude, created_at
             FROM hotels
             WHERE id = $1",
        )
        .bind(hotel_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage("Failed to get hotel", e))?
        .ok_or(Error::NotFound("hotel"))?;

        hotel_from_row(&row)
    }

    /// Inserts a hotel from an admin draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] on query fault.
    pub async fn create_hotel(&self, draft: &HotelDraft) -> Result<Hotel> {
        let id = HotelId::new();
        let row = sqlx::query(
            "INSERT INTO hotels
                 (id, name, city, description, address, price_per_night,
                  rating, image_url, latitude, longitude)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING id, name, city, description, address, price_per_night,
                       rating, image_url, latitude, longitude, created_at",
        )
        .bind(id.as_uuid())
        .bind(&draft.name)
        .bind(&draft.city)
        .bind(&draft.description)
        .bind(&draft.address)
        .bind(draft.price_per_night)
        .bind(draft.rating)
        .bind(draft.image_url.as_deref())
        .bind(draft.latitude)
        .bind(draft.longitude)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage("Failed to create hotel", e))?;

        hotel_from_row(&row)
    }

    /// Replaces a hotel's fields from an admin draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such hotel exists,
    /// [`Error::Storage`] on query fault.
    pub async fn update_hotel(&self, hotel_id: HotelId, draft: &HotelDraft) -> Result<Hotel> {
        let row = sqlx::query(
            "UPDATE hotels
             SET name = $2, city = $3, description = $4, address = $5,
                 price_per_night = $6, rating = $7, image_url = $8,
                 latitude = $9, longitude = $10
             WHERE id = $1
             RETURNING id, name, city, description, address, price_per_night,
                       rating, image_url, latitude, longitude, created_at",
        )
        .bind(hotel_id.as_uuid())
        .bind(&draft.name)
        .bind(&draft.city)
        .bind(&draft.description)
        .bind(&draft.address)
        .bind(draft.price_per_night)
        .bind(draft.rating)
        .bind(draft.image_url.as_deref())
        .bind(draft.latitude)
        .bind(draft.longitude)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage("Failed to update hotel", e))?
        .ok_or(Error::NotFound("hotel"))?;

        hotel_from_row(&row)
    }

    /// Deletes a hotel and, via cascade, its bookings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no such hotel exists,
    /// [`Error::Storage`] on query fault.
    pub async fn delete_hotel(&self, hotel_id: HotelId) -> Result<()> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(hotel_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| storage("Failed to delete hotel", e))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("hotel"));
        }

        Ok(())
    }
}

fn hotel_from_row(row: &PgRow) -> Result<Hotel> {
    let id: Uuid = row.try_get("id").map_err(|e| storage("Bad hotel row", e))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| storage("Bad hotel row", e))?;

    Ok(Hotel {
        id: HotelId::from_uuid(id),
        name: row
            .try_get("name")
            .map_err(|e| storage("Bad hotel row", e))?,
        city: row
            .try_get("city")
            .map_err(|e| storage("Bad hotel row", e))?,
        description: row
            .try_get("description")
            .map_err(|e| storage("Bad hotel row", e))?,
        address: row
            .try_get("address")
            .map_err(|e| storage("Bad hotel row", e))?,
        price_per_night: row
            .try_get("price_per_night")
            .map_err(|e| storage("Bad hotel row", e))?,
        rating: row
            .try_get("rating")
            .map_err(|e| storage("Bad hotel row", e))?,
        image_url: row
            .try_get("image_url")
            .map_err(|e| storage("Bad hotel row", e))?,
        latitude: row
            .try_get("latitude")
            .map_err(|e| storage("Bad hotel row", e))?,
        longitude: row
            .try_get("longitude")
            .map_err(|e| storage("Bad hotel row", e))?,
        created_at,
    })
}
