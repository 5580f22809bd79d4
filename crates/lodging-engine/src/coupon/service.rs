//! Coupon validation, redemption and voiding against bookings.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use lodging_core::config::BookingConfig;
use lodging_core::traits::{AuditSink, Clock};
use lodging_core::types::id::{BookingId, CouponId, CouponUsageId, CustomerId};
use lodging_database::{BookingStore, StoreTx};
use lodging_entity::booking::{Booking, BookingStatus};
use lodging_entity::coupon::{Coupon, CouponUsage, DiscountType};
use lodging_entity::property::PropertySummary;

use super::discount::calculate_discount;
use super::validator::{self, CouponContext, CouponRejection};
use crate::audit::AuditTrail;
use crate::booking::access;
use crate::context::ActorContext;
use crate::error::BookingError;
use crate::retry::with_retry;

/// Result of checking a coupon against a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponValidation {
    pub is_valid: bool,
    pub code: String,
    pub coupon_id: Option<CouponId>,
    pub discount_type: Option<DiscountType>,
    /// Discount the coupon would grant on this booking.
    pub discount_amount: Option<Decimal>,
    /// Booking total after the discount.
    pub total_after_discount: Option<Decimal>,
    /// Specific reason when the coupon cannot be used.
    pub error_reason: Option<String>,
}

/// A coupon reserved inside a booking transaction.
#[derive(Debug, Clone)]
pub(crate) struct Redemption {
    pub coupon: Coupon,
    pub discount: Decimal,
}

/// Inputs for [`redeem_in_tx`].
pub(crate) struct RedeemRequest<'a> {
    pub code: &'a str,
    pub customer_id: CustomerId,
    pub property: &'a PropertySummary,
    pub room_price: Decimal,
    pub nights: u32,
    pub today: NaiveDate,
    pub minor_unit_digits: u32,
}

/// Lock, validate and count a coupon against the current transaction.
/// The caller must insert the usage with [`record_usage`] once the booking
/// row exists.
pub(crate) async fn redeem_in_tx(
    tx: &mut dyn StoreTx,
    req: RedeemRequest<'_>,
) -> Result<Redemption, BookingError> {
    let coupon = tx.lock_coupon(&Coupon::normalize_code(req.code)).await?;
    let prior_customer_uses = match &coupon {
        Some(c) => tx.count_customer_coupon_usages(c.id, req.customer_id).await?,
        None => 0,
    };
    let ctx = CouponContext {
        order_amount: req.room_price,
        nights: req.nights,
        property: req.property,
        today: req.today,
        prior_customer_uses,
    };
    let coupon = validator::validate(coupon.as_ref(), &ctx)?.clone();
    let discount = calculate_discount(
        &coupon,
        req.room_price,
        req.room_price,
        req.nights,
        req.minor_unit_digits,
    );
    if !tx.increment_coupon_usage(coupon.id).await? {
        return Err(CouponRejection::UsageLimitReached.into());
    }
    Ok(Redemption { coupon, discount })
}

/// Insert the usage row for a redemption.
pub(crate) async fn record_usage(
    tx: &mut dyn StoreTx,
    redemption: &Redemption,
    booking: &Booking,
    at: DateTime<Utc>,
) -> Result<CouponUsage, BookingError> {
    let usage = CouponUsage {
        id: CouponUsageId::new(),
        coupon_id: redemption.coupon.id,
        customer_id: booking.customer_id,
        booking_id: booking.id,
        discount_amount: redemption.discount,
        used_at: at,
    };
    tx.insert_coupon_usage(&usage).await?;
    Ok(usage)
}

/// Remove a booking's coupon usage and give the redemption back.
/// Returns the removed usage, or `None` when the booking had no coupon.
pub(crate) async fn void_in_tx(
    tx: &mut dyn StoreTx,
    booking_id: BookingId,
) -> Result<Option<CouponUsage>, BookingError> {
    let Some(usage) = tx.find_coupon_usage(booking_id).await? else {
        return Ok(None);
    };
    tx.lock_coupon_by_id(usage.coupon_id).await?;
    tx.delete_coupon_usage(usage.id).await?;
    tx.decrement_coupon_usage(usage.coupon_id).await?;
    Ok(Some(usage))
}

/// Coupons can only change on bookings that have not started or ended.
fn ensure_open(booking: &Booking) -> Result<(), CouponRejection> {
    match booking.status {
        BookingStatus::Pending | BookingStatus::Confirmed => Ok(()),
        _ => Err(CouponRejection::BookingClosed),
    }
}

/// Validates, applies and cancels coupons on existing bookings.
#[derive(Clone)]
pub struct CouponService {
    store: Arc<dyn BookingStore>,
    audit: AuditTrail,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
    minor_unit_digits: u32,
}

impl CouponService {
    /// Create a new coupon service.
    pub fn new(
        store: Arc<dyn BookingStore>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
        minor_unit_digits: u32,
    ) -> Self {
        Self {
            store,
            audit: AuditTrail::new(audit),
            clock,
            config,
            minor_unit_digits,
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.today(self.config.utc_offset_minutes)
    }

    /// Check whether `code` could be applied to a booking, without
    /// changing anything. Rejections are reported in the result, not as
    /// errors.
    pub async fn validate_coupon(
        &self,
        ctx: &ActorContext,
        code: &str,
        booking_id: BookingId,
    ) -> Result<CouponValidation, BookingError> {
        let booking = self
            .store
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;
        access::ensure_customer_or_admin(ctx, &booking)?;
        let property = self
            .store
            .find_property(booking.property_id)
            .await?
            .ok_or(BookingError::PropertyNotFound(booking.property_id))?;

        let normalized = Coupon::normalize_code(code);
        let coupon = self.store.find_coupon_by_code(&normalized).await?;
        let existing = self.store.find_coupon_usage(booking.id).await?;
        let prior_customer_uses = match &coupon {
            Some(c) => {
                self.store
                    .count_customer_coupon_usages(c.id, booking.customer_id)
                    .await?
            }
            None => 0,
        };
        let coupon_ctx = CouponContext {
            order_amount: booking.room_price,
            nights: u32::try_from(booking.nights).unwrap_or(0),
            property: &property,
            today: self.today(),
            prior_customer_uses,
        };

        let mut result = CouponValidation {
            is_valid: false,
            code: normalized,
            coupon_id: coupon.as_ref().map(|c| c.id),
            discount_type: coupon.as_ref().map(|c| c.discount_type),
            discount_amount: None,
            total_after_discount: None,
            error_reason: None,
        };
        let verdict = match (ensure_open(&booking), &existing) {
            (Err(reason), _) => Err(reason),
            // Applying the redeemed coupon again is a no-op, so it stays valid.
            (Ok(()), Some(usage)) if coupon.as_ref().is_some_and(|c| c.id == usage.coupon_id) => {
                Ok((usage.discount_amount, booking.total_amount))
            }
            (Ok(()), Some(_)) => Err(CouponRejection::AlreadyApplied),
            (Ok(()), None) => validator::validate(coupon.as_ref(), &coupon_ctx).map(|valid| {
                let discount = calculate_discount(
                    valid,
                    booking.room_price,
                    booking.room_price,
                    coupon_ctx.nights,
                    self.minor_unit_digits,
                );
                (discount, booking.room_price - discount)
            }),
        };
        match verdict {
            Ok((discount, total)) => {
                result.is_valid = true;
                result.discount_amount = Some(discount);
                result.total_after_discount = Some(total);
            }
            Err(reason) => result.error_reason = Some(reason.to_string()),
        }
        Ok(result)
    }

    /// Redeem `code` on a booking. Applying the same coupon twice returns
    /// the booking unchanged.
    pub async fn apply_coupon(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        code: &str,
    ) -> Result<Booking, BookingError> {
        let outcome = with_retry(&self.config, "apply_coupon", || {
            self.try_apply(ctx, booking_id, code)
        })
        .await?;

        let Some((old, new, usage)) = outcome else {
            return self
                .store
                .find_booking(booking_id)
                .await?
                .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()));
        };

        info!(
            booking_id = %new.id,
            coupon_id = %usage.coupon_id,
            discount = %usage.discount_amount,
            "Coupon applied"
        );
        self.audit.usage_created(&usage, ctx.actor_id).await;
        self.audit.booking_changed(&old, &new, ctx.actor_id).await;
        Ok(new)
    }

    async fn try_apply(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        code: &str,
    ) -> Result<Option<(Booking, Booking, CouponUsage)>, BookingError> {
        let mut tx = self.store.begin().await?;
        let old = tx
            .lock_booking(booking_id)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;
        access::ensure_customer_or_admin(ctx, &old)?;
        ensure_open(&old)?;

        if let Some(existing) = tx.find_coupon_usage(booking_id).await? {
            let same = tx
                .lock_coupon_by_id(existing.coupon_id)
                .await?
                .is_some_and(|c| c.code == Coupon::normalize_code(code));
            return if same {
                Ok(None)
            } else {
                Err(CouponRejection::AlreadyApplied.into())
            };
        }

        let property = tx
            .find_property(old.property_id)
            .await?
            .ok_or(BookingError::PropertyNotFound(old.property_id))?;
        let redemption = redeem_in_tx(
            tx.as_mut(),
            RedeemRequest {
                code,
                customer_id: old.customer_id,
                property: &property,
                room_price: old.room_price,
                nights: u32::try_from(old.nights).unwrap_or(0),
                today: self.today(),
                minor_unit_digits: self.minor_unit_digits,
            },
        )
        .await?;

        let now = self.clock.now();
        let mut new = old.clone();
        new.discount_amount = redemption.discount;
        new.total_amount = (new.room_price - redemption.discount).max(Decimal::ZERO);
        new.updated_at = now;
        tx.update_booking(&new).await?;
        let usage = record_usage(tx.as_mut(), &redemption, &new, now).await?;
        tx.commit().await?;
        Ok(Some((old, new, usage)))
    }

    /// Remove the coupon from a booking and restore its total. A booking
    /// without a coupon is returned unchanged.
    pub async fn cancel_coupon(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
    ) -> Result<Booking, BookingError> {
        let (old, new, usage) = with_retry(&self.config, "cancel_coupon", || {
            self.try_cancel(ctx, booking_id)
        })
        .await?;

        if let Some(usage) = usage {
            info!(booking_id = %new.id, coupon_id = %usage.coupon_id, "Coupon removed");
            self.audit.usage_removed(&usage, ctx.actor_id).await;
            self.audit.booking_changed(&old, &new, ctx.actor_id).await;
        }
        Ok(new)
    }

    async fn try_cancel(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
    ) -> Result<(Booking, Booking, Option<CouponUsage>), BookingError> {
        let mut tx = self.store.begin().await?;
        let old = tx
            .lock_booking(booking_id)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;
        access::ensure_customer_or_admin(ctx, &old)?;
        ensure_open(&old)?;

        let Some(usage) = void_in_tx(tx.as_mut(), booking_id).await? else {
            return Ok((old.clone(), old, None));
        };
        let mut new = old.clone();
        new.discount_amount = Decimal::ZERO;
        new.total_amount = new.room_price;
        new.updated_at = self.clock.now();
        tx.update_booking(&new).await?;
        tx.commit().await?;
        Ok((old, new, Some(usage)))
    }
}
