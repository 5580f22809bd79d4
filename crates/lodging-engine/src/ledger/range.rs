//! Half-open date ranges.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use lodging_database::OccupiedStay;

use crate::error::BookingError;

/// A stay `[check_in, check_out)`. The check-out day is not a night of the
/// stay, so a stay ending on day X never conflicts with one starting on X.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Build a range with at least one night.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::InvalidDateRange);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// The one-night window `[day, day + 1)`.
    pub fn single_night(day: NaiveDate) -> Result<Self, BookingError> {
        let next = day.succ_opt().ok_or(BookingError::InvalidDateRange)?;
        Self::new(day, next)
    }

    /// Every day of a calendar month as a range.
    pub fn month(year: i32, month: u32) -> Result<Self, BookingError> {
        let invalid = || BookingError::InvalidArgument(format!("Invalid month {year}-{month:02}"));
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        Self::new(first, next)
    }

    /// First night.
    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// Departure day.
    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights.
    pub fn nights(&self) -> u32 {
        u32::try_from((self.check_out - self.check_in).num_days()).unwrap_or(0)
    }

    /// `[a, b)` and `[c, d)` overlap iff `a < d && c < b`.
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Whether `date` is one of the nights.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }

    /// The nights of the stay in order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.check_in
            .iter_days()
            .take_while(move |d| *d < self.check_out)
    }

    /// `(year, month)` of the first night.
    pub fn year_month(&self) -> (i32, u32) {
        (self.check_in.year(), self.check_in.month())
    }
}

/// Rooms held by one booking over its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    pub range: StayRange,
    pub rooms: u32,
}

impl Stay {
    /// Create a stay.
    pub fn new(range: StayRange, rooms: u32) -> Self {
        Self { range, rooms }
    }
}

impl From<OccupiedStay> for Stay {
    fn from(stay: OccupiedStay) -> Self {
        Self {
            range: StayRange {
                check_in: stay.check_in,
                check_out: stay.check_out,
            },
            rooms: u32::try_from(stay.rooms_count).unwrap_or(0),
        }
    }
}
