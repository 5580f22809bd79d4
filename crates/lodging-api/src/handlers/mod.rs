//! Request handlers, grouped by engine service.

pub mod admin;
pub mod availability;
pub mod booking;
pub mod coupon;
pub mod health;
pub mod pricing;
