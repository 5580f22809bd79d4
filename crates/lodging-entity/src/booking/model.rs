//! Booking entity model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lodging_core::types::id::{BookingId, CustomerId, PropertyId, RoomTypeId, UserId};

use super::status::{BookingStatus, PaymentStatus};
use crate::user::UserRole;

/// A single reservation of one or more rooms of a room type.
///
/// Bookings are never deleted; cancellation is a status change that keeps
/// the row for the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Human-readable unique code shown to guests.
    pub booking_code: String,
    /// Customer who made the booking.
    pub customer_id: CustomerId,
    /// Property the room type belongs to.
    pub property_id: PropertyId,
    /// Booked room type.
    pub room_type_id: RoomTypeId,
    /// First night of the stay.
    pub check_in: NaiveDate,
    /// Departure date (exclusive).
    pub check_out: NaiveDate,
    /// Number of nights (`check_out - check_in`).
    pub nights: i32,
    /// Number of rooms reserved.
    pub rooms_count: i32,
    /// Number of adults.
    pub adults: i32,
    /// Number of children.
    pub children: i32,
    /// Room price before coupon discount.
    pub room_price: Decimal,
    /// Coupon discount applied to the room price.
    pub discount_amount: Decimal,
    /// Amount due after discount.
    pub total_amount: Decimal,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Payment state.
    pub payment_status: PaymentStatus,
    /// Free-text requests from the guest.
    pub special_requests: Option<String>,
    /// When the booking was made.
    pub booked_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// When the guest checked in.
    pub checked_in_at: Option<DateTime<Utc>>,
    /// When the guest checked out.
    pub checked_out_at: Option<DateTime<Utc>>,
    /// Who cancelled the booking.
    pub cancelled_by: Option<UserId>,
    /// Role of the user who cancelled.
    pub cancelled_by_role: Option<UserRole>,
    /// Why the booking was cancelled.
    pub cancellation_reason: Option<String>,
    /// When the booking was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Amount refunded on cancellation.
    pub refund_amount: Option<Decimal>,
    /// Note left by an admin on the last status override.
    pub admin_note: Option<String>,
}

/// Cancellation details recorded on a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CancellationInfo {
    /// Who cancelled.
    pub actor_id: UserId,
    /// In which role.
    pub role: UserRole,
    /// Why.
    pub reason: Option<String>,
    /// Refund granted, if any.
    pub refund_amount: Option<Decimal>,
}

impl Booking {
    /// Whether the booking currently holds inventory.
    pub fn occupies_inventory(&self) -> bool {
        self.status.occupies_inventory()
    }

    /// Rooms reserved as an unsigned count.
    pub fn rooms(&self) -> u32 {
        u32::try_from(self.rooms_count).unwrap_or(0)
    }

    /// Record cancellation metadata and move the booking to `cancelled`.
    pub fn mark_cancelled(&mut self, info: CancellationInfo, at: DateTime<Utc>) {
        self.status = BookingStatus::Cancelled;
        self.cancelled_by = Some(info.actor_id);
        self.cancelled_by_role = Some(info.role);
        self.cancellation_reason = info.reason;
        self.cancelled_at = Some(at);
        self.refund_amount = info.refund_amount;
        self.updated_at = at;
    }
}
