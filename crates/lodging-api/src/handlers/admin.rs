//! Admin booking overrides.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use lodging_core::error::AppError;
use lodging_core::types::id::BookingId;

use crate::dto::request::{AdminCancelBody, PaymentBody, StatusOverrideBody};
use crate::error::ApiError;
use crate::extractors::{Actor, PaginationParams};
use crate::state::AppState;

/// POST /api/admin/bookings/{id}/cancel
pub async fn admin_cancel_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(req): Json<AdminCancelBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()?;
    let booking = state
        .engine
        .bookings
        .admin_cancel_booking(&actor, id, req.into())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// PUT /api/admin/bookings/{id}/status
pub async fn update_booking_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(req): Json<StatusOverrideBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()?;
    let booking = state
        .engine
        .bookings
        .update_booking_status(&actor, id, req.into())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// PUT /api/admin/bookings/{id}/payment
pub async fn update_payment_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Json(req): Json<PaymentBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let booking = state
        .engine
        .bookings
        .update_payment_status(&actor, id, req.into())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// GET /api/admin/bookings/{id}/history
pub async fn booking_history(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !actor.is_admin() {
        return Err(AppError::authorization("Only an admin can read booking history").into());
    }
    let repo = state
        .audit_log
        .as_ref()
        .ok_or_else(|| AppError::not_found("Booking history is not recorded by this deployment"))?;
    let history = repo
        .find_for_record("bookings", &id.to_string(), &params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": history })))
}
