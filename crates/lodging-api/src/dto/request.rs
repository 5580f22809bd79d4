//! Request DTOs with validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use lodging_core::types::id::{PropertyId, RoomTypeId};
use lodging_engine::booking::{
    AdminCancelRequest, CancelBookingRequest, CreateBookingRequest, PaymentUpdate, StatusOverride,
};
use lodging_entity::booking::{BookingStatus, PaymentStatus};

/// Query for availability and quote endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StayQuery {
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date (exclusive).
    pub check_out: NaiveDate,
    /// Rooms requested.
    #[serde(default = "default_rooms")]
    #[validate(range(min = 1, max = 500, message = "rooms must be between 1 and 500"))]
    pub rooms: u32,
}

/// Query for the monthly availability calendar.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MonthQuery {
    /// Rooms requested.
    #[serde(default = "default_rooms")]
    #[validate(range(min = 1, max = 500, message = "rooms must be between 1 and 500"))]
    pub rooms: u32,
}

/// Create booking request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingBody {
    /// Property being booked.
    pub property_id: PropertyId,
    /// Room type being booked.
    pub room_type_id: RoomTypeId,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date (exclusive).
    pub check_out: NaiveDate,
    /// Rooms requested.
    #[validate(range(min = 1, max = 500, message = "rooms_count must be at least 1"))]
    pub rooms_count: u32,
    /// Adult guests.
    #[validate(range(min = 1, message = "At least one adult is required"))]
    pub adults: u32,
    /// Child guests.
    #[serde(default)]
    pub children: u32,
    /// Coupon to redeem with the booking.
    #[validate(length(max = 50))]
    pub coupon_code: Option<String>,
    /// Free-text requests for the host.
    #[validate(length(max = 1000))]
    pub special_requests: Option<String>,
}

impl From<CreateBookingBody> for CreateBookingRequest {
    fn from(body: CreateBookingBody) -> Self {
        Self {
            property_id: body.property_id,
            room_type_id: body.room_type_id,
            check_in: body.check_in,
            check_out: body.check_out,
            rooms_count: body.rooms_count,
            adults: body.adults,
            children: body.children,
            coupon_code: body.coupon_code,
            special_requests: body.special_requests,
        }
    }
}

/// Customer or host cancellation body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct CancelBody {
    /// Why the booking is cancelled. Required for hosts.
    #[validate(length(max = 500))]
    pub reason: Option<String>,
}

impl From<CancelBody> for CancelBookingRequest {
    fn from(body: CancelBody) -> Self {
        Self {
            reason: body.reason,
        }
    }
}

/// Admin cancellation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AdminCancelBody {
    /// Why the booking is cancelled.
    #[validate(length(min = 1, max = 500, message = "A cancellation reason is required"))]
    pub reason: String,
    /// Refund for a paid booking. Defaults to the full total.
    pub refund_amount: Option<Decimal>,
}

impl From<AdminCancelBody> for AdminCancelRequest {
    fn from(body: AdminCancelBody) -> Self {
        Self {
            reason: body.reason,
            refund_amount: body.refund_amount,
        }
    }
}

/// Admin status override body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StatusOverrideBody {
    /// Target status.
    pub status: BookingStatus,
    /// Note kept on the booking.
    #[validate(length(max = 500))]
    pub note: Option<String>,
    /// Refund when overriding a paid booking to cancelled.
    pub refund_amount: Option<Decimal>,
}

impl From<StatusOverrideBody> for StatusOverride {
    fn from(body: StatusOverrideBody) -> Self {
        Self {
            status: body.status,
            note: body.note,
            refund_amount: body.refund_amount,
        }
    }
}

/// Admin payment status body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentBody {
    /// Target payment status.
    pub payment_status: PaymentStatus,
    /// Refund when marking the payment refunded.
    pub refund_amount: Option<Decimal>,
}

impl From<PaymentBody> for PaymentUpdate {
    fn from(body: PaymentBody) -> Self {
        Self {
            payment_status: body.payment_status,
            refund_amount: body.refund_amount,
        }
    }
}

/// Coupon code body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CouponCodeBody {
    /// Code typed by the customer.
    #[validate(length(min = 1, max = 50, message = "Coupon code is required"))]
    pub code: String,
}

fn default_rooms() -> u32 {
    1
}
