//! Collaborator traits defined in `lodging-core` and implemented by other crates.

pub mod audit;
pub mod clock;
pub mod holiday;

pub use audit::{AuditAction, AuditRecord, AuditSink};
pub use clock::{Clock, FixedClock, SystemClock};
pub use holiday::HolidayCalendar;
