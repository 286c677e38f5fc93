//! Admin dashboard aggregation queries.

use crate::storage;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use staybook_core::types::{DashboardStats, HotelBookingCount, HotelId, MonthlyCount};
use staybook_core::Result;
use uuid::Uuid;

/// Read-only aggregates over the whole store.
#[derive(Clone)]
pub struct PgDashboard {
    pool: PgPool,
}

impl PgDashboard {
    /// Creates a dashboard over the shared pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Collects the admin dashboard aggregates.
    ///
    /// Plain reads, no transaction: the dashboard tolerates counts that
    /// are a few milliseconds apart.
    ///
    /// # Errors
    ///
    /// Returns [`staybook_core::Error::Storage`] on query fault.
    pub async fn stats(&self) -> Result<DashboardStats> {
        let user_count = self.count("SELECT COUNT(*) FROM users").await?;
        let hotel_count = self.count("SELECT COUNT(*) FROM hotels").await?;
        let booking_count = self.count("SELECT COUNT(*) FROM bookings").await?;

        let total_revenue = sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(total_price), 0)::BIGINT FROM bookings",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage("Failed to sum revenue", e))?;

        let bookings_per_month = sqlx::query(
            "SELECT date_trunc('month', created_at)::date AS month, COUNT(*) AS count
             FROM bookings
             WHERE created_at >= now() - interval '6 months'
             GROUP BY 1
             ORDER BY 1",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to bucket bookings by month", e))?
        .iter()
        .map(|row| {
            let month: NaiveDate = row
                .try_get("month")
                .map_err(|e| storage("Bad month row", e))?;
            let count: i64 = row
                .try_get("count")
                .map_err(|e| storage("Bad month row", e))?;
            Ok(MonthlyCount { month, count })
        })
        .collect::<Result<Vec<_>>>()?;

        let top_hotels = sqlx::query(
            "SELECT h.id, h.name, COUNT(b.id) AS count
             FROM hotels h
             JOIN bookings b ON b.hotel_id = h.id
             GROUP BY h.id, h.name
             ORDER BY count DESC, h.name
             LIMIT 5",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| storage("Failed to rank hotels", e))?
        .iter()
        .map(|row| {
            let id: Uuid = row
                .try_get("id")
                .map_err(|e| storage("Bad hotel rank row", e))?;
            let name: String = row
                .try_get("name")
                .map_err(|e| storage("Bad hotel rank row", e))?;
            let count: i64 = row
                .try_get("count")
                .map_err(|e| storage("Bad hotel rank row", e))?;
            Ok(HotelBookingCount {
                hotel_id: HotelId::from_uuid(id),
                name,
                count,
            })
        })
        .collect::<Result<Vec<_>>>()?;

        Ok(DashboardStats {
            user_count,
            hotel_count,
            booking_count,
            total_revenue,
            bookings_per_month,
            top_hotels,
        })
    }

    async fn count(&self, query: &str) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| storage("Failed to count rows", e))
    }
}
