//! Price quotes for room types.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::warn;

use lodging_core::config::PricingConfig;
use lodging_core::traits::HolidayCalendar;
use lodging_core::types::id::{PropertyId, RoomTypeId};
use lodging_database::BookingStore;
use lodging_entity::room_type::RoomType;

use super::quote::{self, Quote};
use crate::error::BookingError;
use crate::ledger::StayRange;
use crate::lookup;

/// Prices stays from room type rates and the holiday calendar.
#[derive(Clone)]
pub struct PricingCalculator {
    store: Arc<dyn BookingStore>,
    holidays: Arc<dyn HolidayCalendar>,
    config: PricingConfig,
}

impl PricingCalculator {
    /// Create a new calculator.
    pub fn new(
        store: Arc<dyn BookingStore>,
        holidays: Arc<dyn HolidayCalendar>,
        config: PricingConfig,
    ) -> Self {
        Self {
            store,
            holidays,
            config,
        }
    }

    /// Currency settings used for quotes and discounts.
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Quote a stay for a room type of a property.
    pub async fn get_price_quote(
        &self,
        property_id: PropertyId,
        room_type_id: RoomTypeId,
        check_in: NaiveDate,
        check_out: NaiveDate,
        rooms: u32,
    ) -> Result<Quote, BookingError> {
        let range = StayRange::new(check_in, check_out)?;
        let room_type = lookup::room_type_of(self.store.as_ref(), property_id, room_type_id).await?;
        lookup::ensure_active(&room_type)?;
        let holidays = self.holidays_for(&range).await;
        self.quote(&room_type, &range, rooms, &holidays)
    }

    /// Quote with holidays already resolved.
    pub fn quote(
        &self,
        room_type: &RoomType,
        range: &StayRange,
        rooms: u32,
        holidays: &BTreeSet<NaiveDate>,
    ) -> Result<Quote, BookingError> {
        quote::quote(room_type, range, rooms, holidays, &self.config)
    }

    /// Holidays within the stay. A failing calendar prices the stay without
    /// holiday rates instead of failing it.
    pub async fn holidays_for(&self, range: &StayRange) -> BTreeSet<NaiveDate> {
        match self
            .holidays
            .holidays_between(range.check_in(), range.check_out())
            .await
        {
            Ok(days) => days,
            Err(e) => {
                warn!(
                    check_in = %range.check_in(),
                    check_out = %range.check_out(),
                    error = %e,
                    "Holiday calendar unavailable, pricing without holiday rates"
                );
                BTreeSet::new()
            }
        }
    }
}
