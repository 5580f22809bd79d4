//! Coupon eligibility rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lodging_entity::coupon::Coupon;
use lodging_entity::property::PropertySummary;

/// Why a coupon cannot be used. The message is shown to the customer as is.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum CouponRejection {
    #[error("Coupon code does not exist")]
    NotFound,

    #[error("Coupon is no longer active")]
    Inactive,

    #[error("Coupon is not valid until {starts_on}")]
    NotYetValid { starts_on: NaiveDate },

    #[error("Coupon expired on {ended_on}")]
    Expired { ended_on: NaiveDate },

    #[error("Coupon has reached its usage limit")]
    UsageLimitReached,

    #[error("You have already used this coupon the maximum number of times ({limit})")]
    CustomerLimitReached { limit: i32 },

    #[error("Order amount must be at least {minimum} to use this coupon")]
    BelowMinimumOrder { minimum: Decimal },

    #[error("Stay must be at least {minimum} nights to use this coupon")]
    BelowMinimumNights { minimum: i32 },

    #[error("Coupon is not applicable to this property")]
    NotApplicable,

    #[error("A different coupon is already applied to this booking")]
    AlreadyApplied,

    #[error("Coupons can only be applied to pending or confirmed bookings")]
    BookingClosed,
}

/// What a coupon is checked against.
#[derive(Debug, Clone, Copy)]
pub struct CouponContext<'a> {
    /// Pre-discount room price of the booking.
    pub order_amount: Decimal,
    /// Nights of the stay.
    pub nights: u32,
    /// Property being booked.
    pub property: &'a PropertySummary,
    /// Calendar date the validity window is checked on.
    pub today: NaiveDate,
    /// Redemptions of this coupon by the customer so far.
    pub prior_customer_uses: i64,
}

/// Check a coupon, stopping at the first failing rule.
///
/// Order: exists and active, validity window, global limit, per-customer
/// limit, minimum order, minimum nights, applicability.
pub fn validate<'c>(
    coupon: Option<&'c Coupon>,
    ctx: &CouponContext<'_>,
) -> Result<&'c Coupon, CouponRejection> {
    let coupon = coupon.ok_or(CouponRejection::NotFound)?;
    if !coupon.is_active {
        return Err(CouponRejection::Inactive);
    }
    if ctx.today < coupon.start_date {
        return Err(CouponRejection::NotYetValid {
            starts_on: coupon.start_date,
        });
    }
    if ctx.today > coupon.end_date {
        return Err(CouponRejection::Expired {
            ended_on: coupon.end_date,
        });
    }
    if coupon.is_exhausted() {
        return Err(CouponRejection::UsageLimitReached);
    }
    if let Some(limit) = coupon.max_uses_per_customer {
        if ctx.prior_customer_uses >= i64::from(limit) {
            return Err(CouponRejection::CustomerLimitReached { limit });
        }
    }
    if let Some(minimum) = coupon.min_order_amount {
        if ctx.order_amount < minimum {
            return Err(CouponRejection::BelowMinimumOrder { minimum });
        }
    }
    if let Some(minimum) = coupon.min_nights {
        if i64::from(ctx.nights) < i64::from(minimum) {
            return Err(CouponRejection::BelowMinimumNights { minimum });
        }
    }
    if !coupon.applies_to(ctx.property) {
        return Err(CouponRejection::NotApplicable);
    }
    Ok(coupon)
}
