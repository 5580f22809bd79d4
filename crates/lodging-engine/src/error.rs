//! Typed failures of engine operations.

use chrono::NaiveDate;
use thiserror::Error;

use lodging_core::error::{AppError, ErrorKind};
use lodging_core::types::id::{PropertyId, RoomTypeId};
use lodging_entity::booking::BookingStatus;

use crate::coupon::CouponRejection;

/// Why an engine operation did not go through.
///
/// Every variant maps to exactly one [`ErrorKind`], which decides how the
/// HTTP layer reports it.
#[derive(Debug, Error)]
pub enum BookingError {
    /// Check-out is not after check-in.
    #[error("Check-out date must be after check-in date")]
    InvalidDateRange,

    /// Fewer than one room requested.
    #[error("At least one room must be requested")]
    InvalidRoomsCount,

    /// More rooms requested than the room type has at all.
    #[error("Requested {requested} rooms but the room type only has {total_rooms}")]
    ExceedsCapacity { requested: u32, total_rooms: u32 },

    /// Guest counts exceed what the rooms can hold.
    #[error("{0}")]
    GuestLimitExceeded(String),

    /// Any other malformed input.
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Property {0} not found")]
    PropertyNotFound(PropertyId),

    #[error("Room type {0} not found")]
    RoomTypeNotFound(RoomTypeId),

    #[error("Room type {0} is not accepting bookings")]
    RoomTypeInactive(RoomTypeId),

    #[error("Room type {room_type_id} does not belong to property {property_id}")]
    PropertyMismatch {
        property_id: PropertyId,
        room_type_id: RoomTypeId,
    },

    #[error("Booking {0} not found")]
    BookingNotFound(String),

    /// Not enough free rooms on at least one night of the stay.
    #[error("Only {available} of the {requested} requested rooms are available for these dates")]
    RoomsUnavailable { requested: u32, available: u32 },

    /// Commit retries were exhausted by concurrent writers.
    #[error("The booking could not be completed because of concurrent changes, please retry")]
    ConcurrencyConflict,

    /// The coupon was rejected; the message is the specific reason.
    #[error(transparent)]
    Coupon(#[from] CouponRejection),

    #[error("Check-in is not possible before {check_in}")]
    TooEarlyForCheckIn { check_in: NaiveDate },

    #[error("Bookings can only be cancelled by the customer before the check-in date {check_in}")]
    CancellationWindowClosed { check_in: NaiveDate },

    /// The status transition table rejected the move.
    #[error("Cannot {action} a booking that is {from}")]
    IllegalTransition { from: BookingStatus, action: String },

    /// The caller's role or ownership does not allow the operation.
    #[error("{0}")]
    NotPermitted(String),

    /// Storage failed.
    #[error(transparent)]
    Persistence(#[from] AppError),
}

impl BookingError {
    /// The category the failure is reported under.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDateRange
            | Self::InvalidRoomsCount
            | Self::ExceedsCapacity { .. }
            | Self::GuestLimitExceeded(_)
            | Self::InvalidArgument(_)
            | Self::RoomTypeInactive(_)
            | Self::PropertyMismatch { .. } => ErrorKind::Validation,
            Self::PropertyNotFound(_) | Self::RoomTypeNotFound(_) | Self::BookingNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::RoomsUnavailable { .. } => ErrorKind::Unavailable,
            Self::ConcurrencyConflict => ErrorKind::Conflict,
            Self::Coupon(_) => ErrorKind::Coupon,
            Self::TooEarlyForCheckIn { .. }
            | Self::CancellationWindowClosed { .. }
            | Self::IllegalTransition { .. } => ErrorKind::InvalidTransition,
            Self::NotPermitted(_) => ErrorKind::Authorization,
            Self::Persistence(e) => e.kind,
        }
    }

    /// Whether retrying the whole transaction may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Persistence(e) if e.is_transient())
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Persistence(e) => e,
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}
