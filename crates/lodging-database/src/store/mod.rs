//! Persistence interface for the booking engine.
//!
//! [`BookingStore`] serves unlocked reads and opens transactions.
//! [`StoreTx`] is a unit of work: everything written through it becomes
//! visible together on [`StoreTx::commit`], and is discarded if the
//! transaction is dropped without committing. The `lock_*` methods take a
//! write lock that is held until the transaction ends, which is how the
//! engine serializes check-then-reserve per room type and
//! check-then-increment per coupon.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lodging_core::result::AppResult;
use lodging_core::types::id::{
    BookingId, CouponId, CouponUsageId, CustomerId, PropertyId, RoomTypeId,
};
use lodging_core::types::pagination::{PageRequest, PageResponse};
use lodging_entity::booking::Booking;
use lodging_entity::coupon::{Coupon, CouponUsage};
use lodging_entity::property::PropertySummary;
use lodging_entity::room_type::RoomType;

pub use memory::MemoryBookingStore;
pub use postgres::PgBookingStore;

/// The part of an occupying booking the inventory ledger needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct OccupiedStay {
    /// Booking holding the rooms.
    pub booking_id: BookingId,
    /// First night.
    pub check_in: NaiveDate,
    /// Departure date (exclusive).
    pub check_out: NaiveDate,
    /// Rooms held.
    pub rooms_count: i32,
}

impl OccupiedStay {
    /// Project an occupying booking.
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            check_in: booking.check_in,
            check_out: booking.check_out,
            rooms_count: booking.rooms_count,
        }
    }
}

/// Read access and transaction factory.
#[async_trait]
pub trait BookingStore: Send + Sync + 'static {
    /// Open a new unit of work.
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>>;

    /// Whether the backing store is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Find a property summary.
    async fn find_property(&self, id: PropertyId) -> AppResult<Option<PropertySummary>>;

    /// Find a room type.
    async fn find_room_type(&self, id: RoomTypeId) -> AppResult<Option<RoomType>>;

    /// Occupying bookings of a room type overlapping `[from, to)`.
    async fn occupying_stays(
        &self,
        room_type_id: RoomTypeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<OccupiedStay>>;

    /// Find a booking by id.
    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>>;

    /// Find a booking by its human-readable code.
    async fn find_booking_by_code(&self, code: &str) -> AppResult<Option<Booking>>;

    /// A customer's bookings, newest first.
    async fn list_customer_bookings(
        &self,
        customer_id: CustomerId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>>;

    /// Find a coupon by its normalized code.
    async fn find_coupon_by_code(&self, code: &str) -> AppResult<Option<Coupon>>;

    /// How many times a customer has redeemed a coupon.
    async fn count_customer_coupon_usages(
        &self,
        coupon_id: CouponId,
        customer_id: CustomerId,
    ) -> AppResult<i64>;

    /// The coupon redemption attached to a booking, if any.
    async fn find_coupon_usage(&self, booking_id: BookingId) -> AppResult<Option<CouponUsage>>;
}

/// A single transactional unit of work.
#[async_trait]
pub trait StoreTx: Send {
    /// Load a room type and hold its write lock until the transaction ends.
    async fn lock_room_type(&mut self, id: RoomTypeId) -> AppResult<Option<RoomType>>;

    /// Find a property summary.
    async fn find_property(&mut self, id: PropertyId) -> AppResult<Option<PropertySummary>>;

    /// Occupying bookings overlapping `[from, to)`, optionally ignoring one
    /// booking (the one being re-admitted).
    async fn occupying_stays(
        &mut self,
        room_type_id: RoomTypeId,
        from: NaiveDate,
        to: NaiveDate,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<OccupiedStay>>;

    /// Load a booking and hold its write lock.
    async fn lock_booking(&mut self, id: BookingId) -> AppResult<Option<Booking>>;

    /// Insert a new booking. Fails with a conflict on a duplicate code.
    async fn insert_booking(&mut self, booking: &Booking) -> AppResult<()>;

    /// Overwrite a booking's mutable columns.
    async fn update_booking(&mut self, booking: &Booking) -> AppResult<()>;

    /// Load a coupon by normalized code and hold its write lock.
    async fn lock_coupon(&mut self, code: &str) -> AppResult<Option<Coupon>>;

    /// Load a coupon by id and hold its write lock.
    async fn lock_coupon_by_id(&mut self, id: CouponId) -> AppResult<Option<Coupon>>;

    /// How many times a customer has redeemed a coupon.
    async fn count_customer_coupon_usages(
        &mut self,
        coupon_id: CouponId,
        customer_id: CustomerId,
    ) -> AppResult<i64>;

    /// The coupon redemption attached to a booking, if any.
    async fn find_coupon_usage(&mut self, booking_id: BookingId) -> AppResult<Option<CouponUsage>>;

    /// Record a redemption. Fails with a conflict if the booking already has one.
    async fn insert_coupon_usage(&mut self, usage: &CouponUsage) -> AppResult<()>;

    /// Remove a redemption.
    async fn delete_coupon_usage(&mut self, id: CouponUsageId) -> AppResult<()>;

    /// Increment `used_count` unless it has reached `max_total_uses`.
    /// Returns `false` when the cap stopped the increment.
    async fn increment_coupon_usage(&mut self, id: CouponId) -> AppResult<bool>;

    /// Decrement `used_count`, never below zero.
    async fn decrement_coupon_usage(&mut self, id: CouponId) -> AppResult<()>;

    /// Make every write visible atomically.
    async fn commit(self: Box<Self>) -> AppResult<()>;
}
