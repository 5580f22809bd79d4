//! Price quote handler.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use lodging_core::types::id::{PropertyId, RoomTypeId};

use crate::dto::request::StayQuery;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/properties/{property_id}/room-types/{room_type_id}/quote
pub async fn get_price_quote(
    State(state): State<AppState>,
    Path((property_id, room_type_id)): Path<(PropertyId, RoomTypeId)>,
    Query(query): Query<StayQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    query.validate()?;
    let quote = state
        .engine
        .pricing
        .get_price_quote(
            property_id,
            room_type_id,
            query.check_in,
            query.check_out,
            query.rooms,
        )
        .await?;

    Ok(Json(serde_json::json!({ "success": true, "data": quote })))
}
