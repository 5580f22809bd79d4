//! Time source abstraction so lifecycle guards can be tested deterministically.

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Provides the current time.
pub trait Clock: Send + Sync + 'static {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The calendar date at `now`, shifted by a fixed UTC offset.
    fn today(&self, utc_offset_minutes: i32) -> NaiveDate {
        (self.now() + Duration::minutes(i64::from(utc_offset_minutes))).date_naive()
    }
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
