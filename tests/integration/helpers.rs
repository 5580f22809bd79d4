//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{NaiveDate, TimeZone, Utc};
use http::{Request, StatusCode};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

use lodging_api::{AppState, build_app};
use lodging_core::config::{AppConfig, StoreProvider};
use lodging_core::traits::FixedClock;
use lodging_core::types::id::{CouponId, PropertyId, RoomTypeId, UserId};
use lodging_database::{MemoryAuditSink, MemoryBookingStore};
use lodging_engine::{BookingEngine, StaticHolidayCalendar};
use lodging_entity::coupon::{Coupon, CouponScope, DiscountType};
use lodging_entity::property::PropertySummary;
use lodging_entity::room_type::RoomType;

/// Builds a date in 2026.
pub fn date(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, month, day).expect("valid date")
}

/// Identity sent in the actor headers.
#[derive(Debug, Clone, Copy)]
pub struct Caller {
    pub id: UserId,
    pub role: &'static str,
}

/// Test application: the full router over the in-memory store, with the
/// clock frozen at 2026-01-01 10:00 UTC.
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Store handle for seeding and inspection
    pub store: MemoryBookingStore,
    /// Audit records written by the engine
    pub audit: Arc<MemoryAuditSink>,
    pub property: PropertySummary,
    pub room_type: RoomType,
    pub host: Caller,
    pub customer: Caller,
    pub admin: Caller,
}

impl TestApp {
    /// Create a new test application with one room type of `total_rooms`.
    pub async fn new(total_rooms: i32) -> Self {
        let mut config = AppConfig::default();
        config.database.provider = StoreProvider::Memory;
        config.booking.retry_backoff_ms = 1;

        let store = MemoryBookingStore::new();
        let audit = Arc::new(MemoryAuditSink::new());
        let host = Caller {
            id: UserId::new(),
            role: "host",
        };

        let property = PropertySummary {
            id: PropertyId::new(),
            host_id: host.id,
            property_type: "homestay".to_string(),
            city: "Hoi An".to_string(),
        };
        let room_type = RoomType {
            id: RoomTypeId::new(),
            property_id: property.id,
            name: "Garden Bungalow".to_string(),
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

        let now = Utc
            .with_ymd_and_hms(2026, 1, 1, 10, 0, 0)
            .single()
            .expect("valid instant");
        let engine = BookingEngine::new(
            Arc::new(store.clone()),
            Arc::new(StaticHolidayCalendar::from_config(&config.pricing)),
            audit.clone(),
            Arc::new(FixedClock(now)),
            &config,
        );
        let router = build_app(AppState::new(config, engine));

        Self {
            router,
            store,
            audit,
            property,
            room_type,
            host,
            customer: Caller {
                id: UserId::new(),
                role: "customer",
            },
            admin: Caller {
                id: UserId::new(),
                role: "admin",
            },
        }
    }

    /// Another customer.
    pub fn other_customer(&self) -> Caller {
        Caller {
            id: UserId::new(),
            role: "customer",
        }
    }

    /// Path prefix of the seeded room type.
    pub fn room_type_path(&self) -> String {
        format!(
            "/api/properties/{}/room-types/{}",
            self.property.id, self.room_type.id
        )
    }

    /// Body for `POST /api/bookings`.
    pub fn booking_body(&self, check_in: NaiveDate, check_out: NaiveDate, rooms: u32) -> Value {
        serde_json::json!({
            "property_id": self.property.id,
            "room_type_id": self.room_type.id,
            "check_in": check_in,
            "check_out": check_out,
            "rooms_count": rooms,
            "adults": 2,
        })
    }

    /// Create a booking and return its data, panicking unless it succeeds.
    pub async fn book(&self, caller: Caller, body: Value) -> Value {
        let response = self.request("POST", "/api/bookings", Some(body), Some(caller)).await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"].clone()
    }

    /// Seed a 10% coupon capped at 100,000, adjusted by `edit`.
    pub async fn seed_coupon(&self, code: &str, edit: impl FnOnce(&mut Coupon)) -> Coupon {
        let mut coupon = Coupon {
            id: CouponId::new(),
            code: code.to_string(),
            description: Some("Integration test coupon".to_string()),
            discount_type: DiscountType::Percentage,
            discount_value: dec!(10),
            max_discount_amount: Some(dec!(100000)),
            min_order_amount: None,
            min_nights: None,
            start_date: date(1, 1),
            end_date: date(12, 31),
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

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        caller: Option<Caller>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(caller) = caller {
            req = req
                .header("x-actor-id", caller.id.to_string())
                .header("x-actor-role", caller.role);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// Reads a decimal serialized as a JSON string.
pub fn money(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().expect("decimal string")).expect("decimal")
}
