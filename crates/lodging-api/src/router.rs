//! Route definitions for the booking HTTP API.
//!
//! All routes are mounted under `/api` and receive `AppState` through
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with every route and its state.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(inventory_routes())
        .merge(booking_routes())
        .merge(coupon_routes())
        .merge(admin_routes())
        .route("/health", get(handlers::health::health));

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Availability and quotes per room type
fn inventory_routes() -> Router<AppState> {
    const BASE: &str = "/properties/{property_id}/room-types/{room_type_id}";
    Router::new()
        .route(
            &format!("{BASE}/availability"),
            get(handlers::availability::check_availability),
        )
        .route(
            &format!("{BASE}/availability/detailed"),
            get(handlers::availability::check_availability_detailed),
        )
        .route(
            &format!("{BASE}/availability/{{year}}/{{month}}"),
            get(handlers::availability::available_dates),
        )
        .route(
            &format!("{BASE}/quote"),
            get(handlers::pricing::get_price_quote),
        )
}

/// Booking creation, lookup and lifecycle
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bookings",
            post(handlers::booking::create_booking).get(handlers::booking::list_my_bookings),
        )
        .route("/bookings/{id}", get(handlers::booking::get_booking))
        .route(
            "/bookings/code/{code}",
            get(handlers::booking::get_booking_by_code),
        )
        .route(
            "/bookings/{id}/confirm",
            post(handlers::booking::confirm_booking),
        )
        .route("/bookings/{id}/cancel", post(handlers::booking::cancel_booking))
        .route("/bookings/{id}/check-in", post(handlers::booking::check_in))
        .route("/bookings/{id}/check-out", post(handlers::booking::check_out))
        .route(
            "/customers/{customer_id}/bookings",
            get(handlers::booking::list_customer_bookings),
        )
}

/// Coupon validation and redemption on a booking
fn coupon_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/bookings/{id}/coupon",
            post(handlers::coupon::apply_coupon).delete(handlers::coupon::cancel_coupon),
        )
        .route(
            "/bookings/{id}/coupon/validate",
            post(handlers::coupon::validate_coupon),
        )
}

/// Admin overrides
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/admin/bookings/{id}/cancel",
            post(handlers::admin::admin_cancel_booking),
        )
        .route(
            "/admin/bookings/{id}/status",
            put(handlers::admin::update_booking_status),
        )
        .route(
            "/admin/bookings/{id}/payment",
            put(handlers::admin::update_payment_status),
        )
        .route(
            "/admin/bookings/{id}/history",
            get(handlers::admin::booking_history),
        )
}
