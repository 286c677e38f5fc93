//! Route table and middleware stack.

use crate::handlers::{auth, bookings, dashboard, health, hotels, uploads, vouchers};
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Build the application router.
///
/// # Routes
///
/// ## Auth
/// - `POST /api/auth/register` - Create an account
/// - `POST /api/auth/login` - Mint a bearer token
/// - `POST /api/auth/logout` - Destroy the session
/// - `GET /api/auth/me` - Profile with point balance
///
/// ## Hotels
/// - `GET /api/hotels` - List (optional `city` filter)
/// - `GET /api/hotels/:id` - Fetch one
/// - `POST /api/hotels` - Create (admin)
/// - `PUT /api/hotels/:id` - Update (admin)
/// - `DELETE /api/hotels/:id` - Delete (admin)
///
/// ## Bookings
/// - `POST /api/bookings` - Book a stay
/// - `GET /api/bookings` - Own bookings
/// - `GET /api/bookings/:id` - One booking (owner or admin)
/// - `DELETE /api/bookings/:id` - Delete (admin)
///
/// ## Vouchers
/// - `GET /api/vouchers` - Catalog
/// - `POST /api/vouchers/:id/redeem` - Exchange points
/// - `GET /api/vouchers/mine` - Own redemptions
/// - `POST /api/vouchers` - Create (admin)
/// - `DELETE /api/vouchers/:id` - Delete (admin)
///
/// ## Admin
/// - `GET /api/admin/dashboard` - Aggregates
/// - `GET /api/admin/bookings` - Every booking
/// - `POST /api/admin/uploads` - Catalog image upload
///
/// ## Infrastructure
/// - `GET /health`, `GET /health/ready`
/// - `GET /uploads/*` - Static catalog images
#[must_use]
pub fn app_router(state: AppState) -> Router {
    // Multipart framing needs headroom beyond the raw file cap.
    let upload_body_limit = state.uploads.max_bytes + 64 * 1024;

    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/hotels", get(hotels::list).post(hotels::create))
        .route(
            "/api/hotels/:id",
            get(hotels::get).put(hotels::update).delete(hotels::delete),
        )
        .route(
            "/api/bookings",
            get(bookings::list_mine).post(bookings::create),
        )
        .route(
            "/api/bookings/:id",
            get(bookings::get).delete(bookings::delete),
        )
        .route("/api/vouchers", get(vouchers::list).post(vouchers::create))
        .route("/api/vouchers/mine", get(vouchers::mine))
        .route("/api/vouchers/:id", delete(vouchers::delete))
        .route("/api/vouchers/:id/redeem", post(vouchers::redeem))
        .route("/api/admin/dashboard", get(dashboard::stats))
        .route("/api/admin/bookings", get(bookings::list_all))
        .route(
            "/api/admin/uploads",
            post(uploads::upload).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .nest_service("/uploads", ServeDir::new(&state.uploads.dir))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
