//! Coupon redemption record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lodging_core::types::id::{BookingId, CouponId, CouponUsageId, CustomerId};

/// One redemption of a coupon by a booking. At most one per booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CouponUsage {
    /// Usage identifier.
    pub id: CouponUsageId,
    /// Redeemed coupon.
    pub coupon_id: CouponId,
    /// Customer who redeemed it.
    pub customer_id: CustomerId,
    /// Booking it was redeemed on.
    pub booking_id: BookingId,
    /// Discount granted.
    pub discount_amount: Decimal,
    /// When the coupon was redeemed.
    pub used_at: DateTime<Utc>,
}
