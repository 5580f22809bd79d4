//! Wiring of the engine's services over one store.

use std::sync::Arc;

use lodging_core::config::AppConfig;
use lodging_core::traits::{AuditSink, Clock, HolidayCalendar};
use lodging_database::BookingStore;

use crate::booking::BookingService;
use crate::coupon::CouponService;
use crate::error::BookingError;
use crate::ledger::InventoryLedger;
use crate::pricing::PricingCalculator;

/// The four engine services sharing one store, clock and audit sink.
#[derive(Clone)]
pub struct BookingEngine {
    /// Availability queries.
    pub ledger: Arc<InventoryLedger>,
    /// Price quotes.
    pub pricing: Arc<PricingCalculator>,
    /// Coupon validation and redemption.
    pub coupons: Arc<CouponService>,
    /// Booking creation and lifecycle.
    pub bookings: Arc<BookingService>,
    store: Arc<dyn BookingStore>,
}

impl BookingEngine {
    /// Build every service from the loaded configuration.
    pub fn new(
        store: Arc<dyn BookingStore>,
        holidays: Arc<dyn HolidayCalendar>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
        config: &AppConfig,
    ) -> Self {
        let ledger = Arc::new(InventoryLedger::new(Arc::clone(&store)));
        let pricing = Arc::new(PricingCalculator::new(
            Arc::clone(&store),
            holidays,
            config.pricing.clone(),
        ));
        let coupons = Arc::new(CouponService::new(
            Arc::clone(&store),
            Arc::clone(&audit),
            Arc::clone(&clock),
            config.booking.clone(),
            config.pricing.minor_unit_digits,
        ));
        let bookings = Arc::new(BookingService::new(
            Arc::clone(&store),
            Arc::clone(&pricing),
            audit,
            clock,
            config.booking.clone(),
        ));

        Self {
            ledger,
            pricing,
            coupons,
            bookings,
            store,
        }
    }

    /// Whether the store answers queries.
    pub async fn health_check(&self) -> Result<bool, BookingError> {
        Ok(self.store.health_check().await?)
    }
}
