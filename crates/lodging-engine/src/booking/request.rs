//! Inputs of booking operations.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lodging_core::types::id::{PropertyId, RoomTypeId};
use lodging_entity::booking::{BookingStatus, PaymentStatus};

/// A customer's booking request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub property_id: PropertyId,
    pub room_type_id: RoomTypeId,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub rooms_count: u32,
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub special_requests: Option<String>,
}

/// Cancellation by the customer or the host. Hosts must give a reason.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

/// Cancellation by an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCancelRequest {
    pub reason: String,
    /// Refund recorded on a paid booking; defaults to the full total.
    #[serde(default)]
    pub refund_amount: Option<Decimal>,
}

/// Admin status override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOverride {
    pub status: BookingStatus,
    #[serde(default)]
    pub note: Option<String>,
    /// Refund recorded when the override cancels a paid booking.
    #[serde(default)]
    pub refund_amount: Option<Decimal>,
}

/// Admin payment status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentUpdate {
    pub payment_status: PaymentStatus,
    /// Amount refunded when moving to `refunded`; defaults to the full total.
    #[serde(default)]
    pub refund_amount: Option<Decimal>,
}
