//! Fixtures shared by the service tests.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal_macros::dec;

use lodging_core::config::AppConfig;
use lodging_core::traits::FixedClock;
use lodging_core::types::id::{CouponId, PropertyId, RoomTypeId, UserId};
use lodging_database::{MemoryAuditSink, MemoryBookingStore};
use lodging_entity::coupon::{Coupon, CouponScope, DiscountType};
use lodging_entity::property::PropertySummary;
use lodging_entity::room_type::RoomType;

use crate::booking::CreateBookingRequest;
use crate::context::ActorContext;
use crate::engine::BookingEngine;
use crate::pricing::StaticHolidayCalendar;

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One property with one room type, an engine whose clock reads
/// 2026-01-01 10:00 UTC, and handles on the in-memory backends.
pub(crate) struct Fixture {
    pub store: MemoryBookingStore,
    pub audit: Arc<MemoryAuditSink>,
    pub engine: BookingEngine,
    pub host: UserId,
    pub customer: UserId,
    pub property: PropertySummary,
    pub room_type: RoomType,
}

impl Fixture {
    pub async fn new(total_rooms: i32) -> Self {
        let store = MemoryBookingStore::new();
        let host = UserId::new();
        let property = PropertySummary {
            id: PropertyId::new(),
            host_id: host,
            property_type: "hotel".to_string(),
            city: "Da Nang".to_string(),
        };
        let room_type = RoomType {
            id: RoomTypeId::new(),
            property_id: property.id,
            name: "Sea View Double".to_string(),
            total_rooms,
            base_price: dec!(1000000),
            weekend_price: Some(dec!(1200000)),
            holiday_price: None,
            weekly_discount_percent: dec!(10),
            monthly_discount_percent: dec!(25),
            max_adults: 2,
            max_children: 1,
            max_guests: 3,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        store.insert_property(property.clone()).await;
        store.insert_room_type(room_type.clone()).await;

        let audit = Arc::new(MemoryAuditSink::new());
        Self {
            engine: build_engine(&store, &audit, date(2026, 1, 1)),
            store,
            audit,
            host,
            customer: UserId::new(),
            property,
            room_type,
        }
    }

    /// An engine over the same store whose clock reads `today` at 10:00 UTC.
    pub fn engine_on(&self, today: NaiveDate) -> BookingEngine {
        build_engine(&self.store, &self.audit, today)
    }

    pub fn customer_ctx(&self) -> ActorContext {
        ActorContext::customer(self.customer)
    }

    pub fn host_ctx(&self) -> ActorContext {
        ActorContext::host(self.host)
    }

    pub fn admin_ctx(&self) -> ActorContext {
        ActorContext::admin(UserId::new())
    }

    pub fn request(&self, check_in: NaiveDate, check_out: NaiveDate, rooms: u32) -> CreateBookingRequest {
        CreateBookingRequest {
            property_id: self.property.id,
            room_type_id: self.room_type.id,
            check_in,
            check_out,
            rooms_count: rooms,
            adults: 2,
            children: 0,
            coupon_code: None,
            special_requests: None,
        }
    }

    /// Seed a 10% coupon capped at 100,000, adjusted by `edit`.
    pub async fn coupon(&self, code: &str, edit: impl FnOnce(&mut Coupon)) -> Coupon {
        let mut coupon = Coupon {
            id: CouponId::new(),
            code: code.to_string(),
            description: None,
            discount_type: DiscountType::Percentage,
            discount_value: dec!(10),
            max_discount_amount: Some(dec!(100000)),
            min_order_amount: None,
            min_nights: None,
            start_date: date(2026, 1, 1),
            end_date: date(2026, 12, 31),
            max_total_uses: None,
            max_uses_per_customer: None,
            used_count: 0,
            is_active: true,
            applicable_to: CouponScope::All,
            applicable_target: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        edit(&mut coupon);
        self.store.insert_coupon(coupon.clone()).await;
        coupon
    }
}

fn build_engine(store: &MemoryBookingStore, audit: &Arc<MemoryAuditSink>, today: NaiveDate) -> BookingEngine {
    let now = Utc.from_utc_datetime(&today.and_hms_opt(10, 0, 0).unwrap());
    let mut config = AppConfig::default();
    config.booking.retry_backoff_ms = 1;
    BookingEngine::new(
        Arc::new(store.clone()),
        Arc::new(StaticHolidayCalendar::new(Vec::new())),
        audit.clone(),
        Arc::new(FixedClock(now)),
        &config,
    )
}
