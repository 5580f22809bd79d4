//! Booking domain entities.

pub mod model;
pub mod status;

pub use model::{Booking, CancellationInfo};
pub use status::{BookingStatus, PaymentStatus};
