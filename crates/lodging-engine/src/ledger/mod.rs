//! Inventory ledger.
//!
//! Occupancy is never stored: it is derived from the occupying bookings of
//! a room type each time it is needed.

pub mod occupancy;
pub mod range;
pub mod service;

pub use occupancy::{available_dates, is_available, peak_occupancy, rooms_free};
pub use range::{Stay, StayRange};
pub use service::{AvailabilityReport, InventoryLedger};
