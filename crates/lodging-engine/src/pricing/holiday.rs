//! Holiday calendar backed by a fixed list of dates.

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;

use lodging_core::config::PricingConfig;
use lodging_core::result::AppResult;
use lodging_core::traits::HolidayCalendar;

/// Serves holidays from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticHolidayCalendar {
    dates: BTreeSet<NaiveDate>,
}

impl StaticHolidayCalendar {
    /// Create a calendar from explicit dates.
    pub fn new(dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            dates: dates.into_iter().collect(),
        }
    }

    /// Create a calendar from the `pricing.holidays` setting.
    pub fn from_config(config: &PricingConfig) -> Self {
        Self::new(config.holidays.iter().copied())
    }
}

#[async_trait]
impl HolidayCalendar for StaticHolidayCalendar {
    async fn is_holiday(&self, date: NaiveDate) -> AppResult<bool> {
        Ok(self.dates.contains(&date))
    }

    async fn holidays_between(&self, from: NaiveDate, to: NaiveDate) -> AppResult<BTreeSet<NaiveDate>> {
        if to <= from {
            return Ok(BTreeSet::new());
        }
        Ok(self.dates.range(from..to).copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_range_is_half_open() {
        let d = |day| NaiveDate::from_ymd_opt(2026, 9, day).unwrap();
        let calendar = StaticHolidayCalendar::new([d(1), d(2), d(5)]);
        let found = calendar.holidays_between(d(2), d(5)).await.unwrap();
        assert_eq!(found.into_iter().collect::<Vec<_>>(), vec![d(2)]);
        assert!(calendar.is_holiday(d(5)).await.unwrap());
    }
}
