//! Holiday calendar lookup.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::result::AppResult;

/// Answers which dates are public holidays for pricing purposes.
///
/// The calendar is owned by an external collaborator. Callers treat a
/// failed lookup as "no holidays" rather than failing the quote.
#[async_trait]
pub trait HolidayCalendar: Send + Sync + 'static {
    /// Whether `date` is a holiday.
    async fn is_holiday(&self, date: NaiveDate) -> AppResult<bool>;

    /// All holidays in the half-open range `[from, to)`.
    ///
    /// The default implementation asks [`HolidayCalendar::is_holiday`] for
    /// each date; implementations backed by a range query should override it.
    async fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<BTreeSet<NaiveDate>> {
        let mut holidays = BTreeSet::new();
        let mut date = from;
        while date < to {
            if self.is_holiday(date).await? {
                holidays.insert(date);
            }
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        Ok(holidays)
    }
}
