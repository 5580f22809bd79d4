//! Rule-based pricing.

pub mod holiday;
pub mod quote;
pub mod service;

pub use holiday::StaticHolidayCalendar;
pub use quote::{LengthOfStayDiscount, NightlyRate, Quote, RateKind, round_money};
pub use service::PricingCalculator;
