//! Room type resolution shared by the services.

use lodging_core::types::id::{PropertyId, RoomTypeId};
use lodging_database::{BookingStore, StoreTx};
use lodging_entity::room_type::RoomType;

use crate::error::BookingError;

fn check_owner(
    room_type: RoomType,
    property_id: PropertyId,
) -> Result<RoomType, BookingError> {
    if room_type.property_id != property_id {
        return Err(BookingError::PropertyMismatch {
            property_id,
            room_type_id: room_type.id,
        });
    }
    Ok(room_type)
}

/// Load a room type and check that it belongs to `property_id`.
pub(crate) async fn room_type_of(
    store: &dyn BookingStore,
    property_id: PropertyId,
    room_type_id: RoomTypeId,
) -> Result<RoomType, BookingError> {
    let room_type = store
        .find_room_type(room_type_id)
        .await?
        .ok_or(BookingError::RoomTypeNotFound(room_type_id))?;
    check_owner(room_type, property_id)
}

/// Lock a room type inside a transaction and check that it belongs to
/// `property_id`.
pub(crate) async fn lock_room_type_of(
    tx: &mut dyn StoreTx,
    property_id: PropertyId,
    room_type_id: RoomTypeId,
) -> Result<RoomType, BookingError> {
    let room_type = tx
        .lock_room_type(room_type_id)
        .await?
        .ok_or(BookingError::RoomTypeNotFound(room_type_id))?;
    check_owner(room_type, property_id)
}

/// Fail unless the room type is bookable.
pub(crate) fn ensure_active(room_type: &RoomType) -> Result<(), BookingError> {
    if room_type.is_active && room_type.total_rooms >= 1 {
        Ok(())
    } else {
        Err(BookingError::RoomTypeInactive(room_type.id))
    }
}
