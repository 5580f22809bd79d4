//! # lodging-engine
//!
//! The booking and availability engine. Pure functions carry the hard
//! rules (overlap math in [`ledger`], rate selection and length-of-stay
//! discounts in [`pricing`], coupon eligibility and discount math in
//! [`coupon`], the status transition table in [`booking::state_machine`]).
//! The services around them load data through the
//! [`lodging_database::BookingStore`] interface and commit every booking,
//! inventory effect and coupon redemption in one transaction.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod booking;
pub mod context;
pub mod coupon;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod pricing;
pub mod retry;

mod audit;
mod lookup;
#[cfg(test)]
mod testing;

pub use booking::BookingService;
pub use context::ActorContext;
pub use coupon::{CouponRejection, CouponService};
pub use engine::BookingEngine;
pub use error::BookingError;
pub use ledger::InventoryLedger;
pub use pricing::{PricingCalculator, StaticHolidayCalendar};
