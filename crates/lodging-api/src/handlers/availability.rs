//! Availability handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use lodging_core::types::id::{PropertyId, RoomTypeId};

use crate::dto::request::{MonthQuery, StayQuery};
use crate::dto::response::{AvailabilityResponse, AvailableDatesResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/properties/{property_id}/room-types/{room_type_id}/availability
pub async fn check_availability(
    State(state): State<AppState>,
    Path((property_id, room_type_id)): Path<(PropertyId, RoomTypeId)>,
    Query(query): Query<StayQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    query.validate()?;
    let available = state
        .engine
        .ledger
        .check_availability(
            property_id,
            room_type_id,
            query.check_in,
            query.check_out,
            query.rooms,
        )
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": AvailabilityResponse { available }
    })))
}

/// GET /api/properties/{property_id}/room-types/{room_type_id}/availability/detailed
pub async fn check_availability_detailed(
    State(state): State<AppState>,
    Path((property_id, room_type_id)): Path<(PropertyId, RoomTypeId)>,
    Query(query): Query<StayQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    query.validate()?;
    let report = state
        .engine
        .ledger
        .check_availability_detailed(
            property_id,
            room_type_id,
            query.check_in,
            query.check_out,
            query.rooms,
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": report })))
}

/// GET /api/properties/{property_id}/room-types/{room_type_id}/availability/{year}/{month}
pub async fn available_dates(
    State(state): State<AppState>,
    Path((property_id, room_type_id, year, month)): Path<(PropertyId, RoomTypeId, i32, u32)>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    query.validate()?;
    let dates = state
        .engine
        .ledger
        .available_dates_in_month(property_id, room_type_id, year, month, query.rooms)
        .await?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": AvailableDatesResponse {
            year,
            month,
            dates: dates.into_iter().collect(),
        }
    })))
}
