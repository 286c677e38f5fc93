//! Admin dashboard handler.

use crate::auth::RequireAdmin;
use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State};
use staybook_core::types::DashboardStats;

/// Back-office aggregates: account, hotel, and booking counts, total
/// revenue, bookings per month, and the most-booked hotels.
///
/// # Endpoint
///
/// `GET /api/admin/dashboard`
pub async fn stats(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = state.dashboard.stats().await?;
    Ok(Json(stats))
}
