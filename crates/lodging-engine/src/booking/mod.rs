//! Booking lifecycle manager.

pub(crate) mod access;
pub mod code;
pub mod request;
pub mod service;
pub mod state_machine;

pub use request::{AdminCancelRequest, CancelBookingRequest, CreateBookingRequest, PaymentUpdate, StatusOverride};
pub use service::BookingService;
pub use state_machine::{LifecycleAction, Transition};
