//! Coupon domain entities.

pub mod kind;
pub mod model;
pub mod usage;

pub use kind::{CouponScope, DiscountType};
pub use model::Coupon;
pub use usage::CouponUsage;
