//! In-process store.
//!
//! The whole state sits behind one async mutex. A transaction holds the
//! mutex for its lifetime and works on a copy of the state, so every
//! transaction is serialized and a dropped transaction leaves no trace.
//! Suitable for a single node and for tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard};

use lodging_core::error::AppError;
use lodging_core::result::AppResult;
use lodging_core::types::id::{
    BookingId, CouponId, CouponUsageId, CustomerId, PropertyId, RoomTypeId,
};
use lodging_core::types::pagination::{PageRequest, PageResponse};
use lodging_entity::booking::Booking;
use lodging_entity::coupon::{Coupon, CouponUsage};
use lodging_entity::property::PropertySummary;
use lodging_entity::room_type::RoomType;

use super::{BookingStore, OccupiedStay, StoreTx};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    properties: HashMap<PropertyId, PropertySummary>,
    room_types: HashMap<RoomTypeId, RoomType>,
    bookings: HashMap<BookingId, Booking>,
    coupons: HashMap<CouponId, Coupon>,
    usages: HashMap<CouponUsageId, CouponUsage>,
}

impl MemoryState {
    fn occupying_stays(
        &self,
        room_type_id: RoomTypeId,
        from: NaiveDate,
        to: NaiveDate,
        exclude: Option<BookingId>,
    ) -> Vec<OccupiedStay> {
        self.bookings
            .values()
            .filter(|b| b.room_type_id == room_type_id)
            .filter(|b| b.occupies_inventory())
            .filter(|b| Some(b.id) != exclude)
            .filter(|b| b.check_in < to && from < b.check_out)
            .map(OccupiedStay::from_booking)
            .collect()
    }

    fn coupon_by_code(&self, code: &str) -> Option<Coupon> {
        self.coupons.values().find(|c| c.code == code).cloned()
    }

    fn count_usages(&self, coupon_id: CouponId, customer_id: CustomerId) -> i64 {
        self.usages
            .values()
            .filter(|u| u.coupon_id == coupon_id && u.customer_id == customer_id)
            .count() as i64
    }

    fn usage_for(&self, booking_id: BookingId) -> Option<CouponUsage> {
        self.usages
            .values()
            .find(|u| u.booking_id == booking_id)
            .cloned()
    }
}

/// A [`BookingStore`] kept entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryBookingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a property.
    pub async fn insert_property(&self, property: PropertySummary) {
        self.state
            .lock()
            .await
            .properties
            .insert(property.id, property);
    }

    /// Add or replace a room type.
    pub async fn insert_room_type(&self, room_type: RoomType) {
        self.state
            .lock()
            .await
            .room_types
            .insert(room_type.id, room_type);
    }

    /// Add or replace a coupon. The code is stored normalized.
    pub async fn insert_coupon(&self, mut coupon: Coupon) {
        coupon.code = Coupon::normalize_code(&coupon.code);
        self.state.lock().await.coupons.insert(coupon.id, coupon);
    }

    /// Snapshot of a coupon, including its current `used_count`.
    pub async fn coupon(&self, id: CouponId) -> Option<Coupon> {
        self.state.lock().await.coupons.get(&id).cloned()
    }

    /// Snapshot of every booking of a room type.
    pub async fn bookings_for_room_type(&self, room_type_id: RoomTypeId) -> Vec<Booking> {
        self.state
            .lock()
            .await
            .bookings
            .values()
            .filter(|b| b.room_type_id == room_type_id)
            .cloned()
            .collect()
    }

    /// Snapshot of every coupon redemption.
    pub async fn coupon_usages(&self) -> Vec<CouponUsage> {
        self.state.lock().await.usages.values().cloned().collect()
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let guard = self.state.clone().lock_owned().await;
        let working = guard.clone();
        Ok(Box::new(MemoryTx { guard, working }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn find_property(&self, id: PropertyId) -> AppResult<Option<PropertySummary>> {
        Ok(self.state.lock().await.properties.get(&id).cloned())
    }

    async fn find_room_type(&self, id: RoomTypeId) -> AppResult<Option<RoomType>> {
        Ok(self.state.lock().await.room_types.get(&id).cloned())
    }

    async fn occupying_stays(
        &self,
        room_type_id: RoomTypeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<OccupiedStay>> {
        Ok(self
            .state
            .lock()
            .await
            .occupying_stays(room_type_id, from, to, None))
    }

    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.state.lock().await.bookings.get(&id).cloned())
    }

    async fn find_booking_by_code(&self, code: &str) -> AppResult<Option<Booking>> {
        Ok(self
            .state
            .lock()
            .await
            .bookings
            .values()
            .find(|b| b.booking_code == code)
            .cloned())
    }

    async fn list_customer_bookings(
        &self,
        customer_id: CustomerId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        let total = bookings.len() as u64;
        let items = bookings
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn find_coupon_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        Ok(self.state.lock().await.coupon_by_code(code))
    }

    async fn count_customer_coupon_usages(
        &self,
        coupon_id: CouponId,
        customer_id: CustomerId,
    ) -> AppResult<i64> {
        Ok(self.state.lock().await.count_usages(coupon_id, customer_id))
    }

    async fn find_coupon_usage(&self, booking_id: BookingId) -> AppResult<Option<CouponUsage>> {
        Ok(self.state.lock().await.usage_for(booking_id))
    }
}

/// Transaction over [`MemoryBookingStore`]: exclusive access plus a working copy.
struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn lock_room_type(&mut self, id: RoomTypeId) -> AppResult<Option<RoomType>> {
        Ok(self.working.room_types.get(&id).cloned())
    }

    async fn find_property(&mut self, id: PropertyId) -> AppResult<Option<PropertySummary>> {
        Ok(self.working.properties.get(&id).cloned())
    }

    async fn occupying_stays(
        &mut self,
        room_type_id: RoomTypeId,
        from: NaiveDate,
        to: NaiveDate,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<OccupiedStay>> {
        Ok(self.working.occupying_stays(room_type_id, from, to, exclude))
    }

    async fn lock_booking(&mut self, id: BookingId) -> AppResult<Option<Booking>> {
        Ok(self.working.bookings.get(&id).cloned())
    }

    async fn insert_booking(&mut self, booking: &Booking) -> AppResult<()> {
        let duplicate = self
            .working
            .bookings
            .values()
            .any(|b| b.id == booking.id || b.booking_code == booking.booking_code);
        if duplicate {
            return Err(AppError::conflict(format!(
                "Booking {} already exists",
                booking.booking_code
            )));
        }
        self.working.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update_booking(&mut self, booking: &Booking) -> AppResult<()> {
        match self.working.bookings.get_mut(&booking.id) {
            Some(existing) => {
                *existing = booking.clone();
                Ok(())
            }
            None => Err(AppError::not_found(format!(
                "Booking {} not found",
                booking.id
            ))),
        }
    }

    async fn lock_coupon(&mut self, code: &str) -> AppResult<Option<Coupon>> {
        Ok(self.working.coupon_by_code(code))
    }

    async fn lock_coupon_by_id(&mut self, id: CouponId) -> AppResult<Option<Coupon>> {
        Ok(self.working.coupons.get(&id).cloned())
    }

    async fn count_customer_coupon_usages(
        &mut self,
        coupon_id: CouponId,
        customer_id: CustomerId,
    ) -> AppResult<i64> {
        Ok(self.working.count_usages(coupon_id, customer_id))
    }

    async fn find_coupon_usage(&mut self, booking_id: BookingId) -> AppResult<Option<CouponUsage>> {
        Ok(self.working.usage_for(booking_id))
    }

    async fn insert_coupon_usage(&mut self, usage: &CouponUsage) -> AppResult<()> {
        if self.working.usage_for(usage.booking_id).is_some() {
            return Err(AppError::conflict(format!(
                "Booking {} already has a coupon",
                usage.booking_id
            )));
        }
        self.working.usages.insert(usage.id, usage.clone());
        Ok(())
    }

    async fn delete_coupon_usage(&mut self, id: CouponUsageId) -> AppResult<()> {
        self.working.usages.remove(&id);
        Ok(())
    }

    async fn increment_coupon_usage(&mut self, id: CouponId) -> AppResult<bool> {
        let Some(coupon) = self.working.coupons.get_mut(&id) else {
            return Err(AppError::not_found(format!("Coupon {id} not found")));
        };
        if coupon.is_exhausted() {
            return Ok(false);
        }
        coupon.used_count += 1;
        Ok(true)
    }

    async fn decrement_coupon_usage(&mut self, id: CouponId) -> AppResult<()> {
        if let Some(coupon) = self.working.coupons.get_mut(&id) {
            coupon.used_count = (coupon.used_count - 1).max(0);
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTx { mut guard, working } = *self;
        *guard = working;
        Ok(())
    }
}
