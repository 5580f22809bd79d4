//! Coupon entity model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lodging_core::types::id::CouponId;

use super::kind::{CouponScope, DiscountType};
use crate::property::PropertySummary;

/// A promotional code redeemable against bookings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Coupon {
    /// Unique coupon identifier.
    pub id: CouponId,
    /// Code typed by the customer, stored uppercase.
    pub code: String,
    /// Optional description.
    pub description: Option<String>,
    /// Discount interpretation.
    pub discount_type: DiscountType,
    /// Percentage, amount, or number of free nights.
    pub discount_value: Decimal,
    /// Upper bound on the computed discount, if any.
    pub max_discount_amount: Option<Decimal>,
    /// Minimum room price for the coupon to apply.
    pub min_order_amount: Option<Decimal>,
    /// Minimum nights for the coupon to apply.
    pub min_nights: Option<i32>,
    /// First valid day (inclusive).
    pub start_date: NaiveDate,
    /// Last valid day (inclusive).
    pub end_date: NaiveDate,
    /// Redemption cap across all customers.
    pub max_total_uses: Option<i32>,
    /// Redemption cap per customer.
    pub max_uses_per_customer: Option<i32>,
    /// Redemptions so far.
    pub used_count: i32,
    /// Whether the coupon is enabled.
    pub is_active: bool,
    /// Applicability scope.
    pub applicable_to: CouponScope,
    /// Scope target (property id, property type, or city).
    pub applicable_target: Option<String>,
    /// When the coupon was created.
    pub created_at: DateTime<Utc>,
    /// When the coupon was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Coupon {
    /// Normalize a user-supplied code for lookup.
    pub fn normalize_code(code: &str) -> String {
        code.trim().to_uppercase()
    }

    /// Whether `date` lies within the validity window.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Whether the global redemption cap has been reached.
    pub fn is_exhausted(&self) -> bool {
        self.max_total_uses
            .is_some_and(|max| self.used_count >= max)
    }

    /// Whether the coupon's scope covers the given property.
    pub fn applies_to(&self, property: &PropertySummary) -> bool {
        let target = self.applicable_target.as_deref().map(str::trim);
        match (self.applicable_to, target) {
            (CouponScope::All, _) => true,
            (_, None) => false,
            (CouponScope::Property, Some(id)) => id.eq_ignore_ascii_case(&property.id.to_string()),
            (CouponScope::PropertyType, Some(kind)) => kind.eq_ignore_ascii_case(&property.property_type),
            (CouponScope::Location, Some(city)) => city.to_lowercase() == property.city.to_lowercase(),
        }
    }
}
