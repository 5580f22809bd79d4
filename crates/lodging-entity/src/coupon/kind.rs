//! Coupon discount type and applicability scope.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a coupon's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "discount_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// Percentage of the room price.
    Percentage,
    /// Absolute amount off the total.
    FixedAmount,
    /// A number of nights at the average nightly rate.
    FreeNight,
}

impl DiscountType {
    /// Return the discount type as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::FixedAmount => "fixed_amount",
            Self::FreeNight => "free_night",
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What a coupon can be applied to. The target value lives in
/// `Coupon::applicable_target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "coupon_scope", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CouponScope {
    /// Every property.
    All,
    /// A single property, target is its id.
    Property,
    /// A property type such as `hotel`, matched case-insensitively.
    PropertyType,
    /// A city, matched case-insensitively.
    Location,
}

impl CouponScope {
    /// Return the scope as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Property => "property",
            Self::PropertyType => "property_type",
            Self::Location => "location",
        }
    }
}

impl fmt::Display for CouponScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
