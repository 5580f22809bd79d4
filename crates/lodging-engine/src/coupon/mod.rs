//! Coupon adjuster.

pub mod discount;
pub mod service;
pub mod validator;

pub use discount::calculate_discount;
pub use service::{CouponService, CouponValidation};
pub use validator::{CouponContext, CouponRejection, validate};
