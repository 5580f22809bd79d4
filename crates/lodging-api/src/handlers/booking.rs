//! Booking creation, lifecycle and lookup handlers.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use lodging_core::error::AppError;
use lodging_core::types::id::{BookingId, CustomerId};

use crate::dto::request::{CancelBody, CreateBookingBody};
use crate::error::ApiError;
use crate::extractors::{Actor, PaginationParams};
use crate::state::AppState;

/// POST /api/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    actor: Actor,
    Json(req): Json<CreateBookingBody>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    req.validate()?;
    let booking = state
        .engine
        .bookings
        .create_booking(&actor, req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "success": true, "data": booking })),
    ))
}

/// GET /api/bookings
pub async fn list_my_bookings(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = state
        .engine
        .bookings
        .list_customer_bookings(&actor, actor.actor_id, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": page })))
}

/// GET /api/customers/{customer_id}/bookings
pub async fn list_customer_bookings(
    State(state): State<AppState>,
    actor: Actor,
    Path(customer_id): Path<CustomerId>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let page = state
        .engine
        .bookings
        .list_customer_bookings(&actor, customer_id, params.into_page_request())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": page })))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let booking = state.engine.bookings.get_booking(&actor, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// GET /api/bookings/code/{code}
pub async fn get_booking_by_code(
    State(state): State<AppState>,
    actor: Actor,
    Path(code): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let booking = state
        .engine
        .bookings
        .get_booking_by_code(&actor, &code)
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// POST /api/bookings/{id}/confirm
pub async fn confirm_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let booking = state.engine.bookings.confirm_booking(&actor, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    // The body is optional for customers.
    let req: CancelBody = if body.is_empty() {
        CancelBody::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?
    };
    req.validate()?;
    let booking = state
        .engine
        .bookings
        .cancel_booking(&actor, id, req.into())
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// POST /api/bookings/{id}/check-in
pub async fn check_in(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let booking = state.engine.bookings.check_in(&actor, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}

/// POST /api/bookings/{id}/check-out
pub async fn check_out(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<BookingId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let booking = state.engine.bookings.check_out(&actor, id).await?;
    Ok(Json(serde_json::json!({ "success": true, "data": booking })))
}
