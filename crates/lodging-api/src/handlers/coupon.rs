//! Coupon handlers scoped to a booking.

use axum::Json;
use axum::extract::{Path, State};
use validator::Validate;

use lodging_core::types::id::BookingId;

use crate::dto::request::CouponCodeBody;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::state::AppState;

/// POST /api/bookings/{id}/coupon/validate
///
/// Always 200 for a visible booking; `is_valid` and `error_reason` carry
/// the verdict.
pub async fn validate_coupon(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(req): Json<CouponCodeBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()?;
    let result = state
        .engine
        .coupons
        .validate_coupon(&actor, &req.code, id)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": result })))
}

/// POST /api/bookings/{id}/coupon
pub async fn apply_coupon(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(req): Json<CouponCodeBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()?;
    let booking = state
        .engine
        .coupons
        .apply_coupon(&actor, id, &req.code)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// DELETE /api/bookings/{id}/coupon
pub async fn cancel_coupon(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let booking = state.engine.coupons.cancel_coupon(&actor, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}
