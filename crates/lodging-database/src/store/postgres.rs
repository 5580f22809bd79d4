//! PostgreSQL store.
//!
//! Write serialization relies on `SELECT ... FOR UPDATE`: a booking
//! transaction locks its room type row before counting overlaps, so two
//! transactions for the same room type cannot both pass the capacity check.
//! Coupon counters use the same row lock plus a conditional update.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};

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
use crate::error::db_err;

const SELECT_PROPERTY: &str = "SELECT id, host_id, property_type, city FROM properties WHERE id = $1";

const SELECT_OCCUPYING: &str = "SELECT id AS booking_id, check_in, check_out, rooms_count \
     FROM bookings \
     WHERE room_type_id = $1 \
       AND status IN ('confirmed', 'checked_in') \
       AND check_in < $3 AND check_out > $2 \
       AND ($4::uuid IS NULL OR id <> $4)";

const SELECT_USAGE_COUNT: &str =
    "SELECT COUNT(*) FROM coupon_usages WHERE coupon_id = $1 AND customer_id = $2";

/// A [`BookingStore`] backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: PgPool,
}

impl PgBookingStore {
    /// Create a new store over an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;
        Ok(Box::new(PgStoreTx { tx }))
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(db_err("Health check failed"))
    }

    async fn find_property(&self, id: PropertyId) -> AppResult<Option<PropertySummary>> {
        sqlx::query_as::<_, PropertySummary>(SELECT_PROPERTY)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find property"))
    }

    async fn find_room_type(&self, id: RoomTypeId) -> AppResult<Option<RoomType>> {
        sqlx::query_as::<_, RoomType>("SELECT * FROM room_types WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find room type"))
    }

    async fn occupying_stays(
        &self,
        room_type_id: RoomTypeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<OccupiedStay>> {
        sqlx::query_as::<_, OccupiedStay>(SELECT_OCCUPYING)
            .bind(room_type_id)
            .bind(from)
            .bind(to)
            .bind(None::<BookingId>)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to load occupying bookings"))
    }

    async fn find_booking(&self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find booking"))
    }

    async fn find_booking_by_code(&self, code: &str) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE booking_code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find booking by code"))
    }

    async fn list_customer_bookings(
        &self,
        customer_id: CustomerId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE customer_id = $1")
            .bind(customer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count customer bookings"))?;

        let items = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE customer_id = $1 \
             ORDER BY booked_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(customer_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list customer bookings"))?;

        Ok(PageResponse::new(items, page, total.max(0) as u64))
    }

    async fn find_coupon_by_code(&self, code: &str) -> AppResult<Option<Coupon>> {
        sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE code = $1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find coupon"))
    }

    async fn count_customer_coupon_usages(
        &self,
        coupon_id: CouponId,
        customer_id: CustomerId,
    ) -> AppResult<i64> {
        sqlx::query_scalar(SELECT_USAGE_COUNT)
            .bind(coupon_id)
            .bind(customer_id)
            .fetch_one(&self.pool)
            .await
            .map_err(db_err("Failed to count coupon usages"))
    }

    async fn find_coupon_usage(&self, booking_id: BookingId) -> AppResult<Option<CouponUsage>> {
        sqlx::query_as::<_, CouponUsage>("SELECT * FROM coupon_usages WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find coupon usage"))
    }
}

/// An open PostgreSQL transaction. Dropping it rolls back.
struct PgStoreTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgStoreTx {
    async fn lock_room_type(&mut self, id: RoomTypeId) -> AppResult<Option<RoomType>> {
        sqlx::query_as::<_, RoomType>("SELECT * FROM room_types WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err("Failed to lock room type"))
    }

    async fn find_property(&mut self, id: PropertyId) -> AppResult<Option<PropertySummary>> {
        sqlx::query_as::<_, PropertySummary>(SELECT_PROPERTY)
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err("Failed to find property"))
    }

    async fn occupying_stays(
        &mut self,
        room_type_id: RoomTypeId,
        from: NaiveDate,
        to: NaiveDate,
        exclude: Option<BookingId>,
    ) -> AppResult<Vec<OccupiedStay>> {
        sqlx::query_as::<_, OccupiedStay>(SELECT_OCCUPYING)
            .bind(room_type_id)
            .bind(from)
            .bind(to)
            .bind(exclude)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(db_err("Failed to load occupying bookings"))
    }

    async fn lock_booking(&mut self, id: BookingId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err("Failed to lock booking"))
    }

    async fn insert_booking(&mut self, b: &Booking) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO bookings (id, booking_code, customer_id, property_id, room_type_id, \
                check_in, check_out, nights, rooms_count, adults, children, room_price, \
                discount_amount, total_amount, status, payment_status, special_requests, \
                booked_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)",
        )
        .bind(b.id)
        .bind(&b.booking_code)
        .bind(b.customer_id)
        .bind(b.property_id)
        .bind(b.room_type_id)
        .bind(b.check_in)
        .bind(b.check_out)
        .bind(b.nights)
        .bind(b.rooms_count)
        .bind(b.adults)
        .bind(b.children)
        .bind(b.room_price)
        .bind(b.discount_amount)
        .bind(b.total_amount)
        .bind(b.status)
        .bind(b.payment_status)
        .bind(&b.special_requests)
        .bind(b.booked_at)
        .bind(b.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(db_err("Failed to insert booking"))?;
        Ok(())
    }

    async fn update_booking(&mut self, b: &Booking) -> AppResult<()> {
        sqlx::query(
            "UPDATE bookings SET status = $2, payment_status = $3, discount_amount = $4, \
                total_amount = $5, updated_at = $6, checked_in_at = $7, checked_out_at = $8, \
                cancelled_by = $9, cancelled_by_role = $10, cancellation_reason = $11, \
                cancelled_at = $12, refund_amount = $13, admin_note = $14 \
             WHERE id = $1",
        )
        .bind(b.id)
        .bind(b.status)
        .bind(b.payment_status)
        .bind(b.discount_amount)
        .bind(b.total_amount)
        .bind(b.updated_at)
        .bind(b.checked_in_at)
        .bind(b.checked_out_at)
        .bind(b.cancelled_by)
        .bind(b.cancelled_by_role)
        .bind(&b.cancellation_reason)
        .bind(b.cancelled_at)
        .bind(b.refund_amount)
        .bind(&b.admin_note)
        .execute(&mut *self.tx)
        .await
        .map_err(db_err("Failed to update booking"))?;
        Ok(())
    }

    async fn lock_coupon(&mut self, code: &str) -> AppResult<Option<Coupon>> {
        sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE code = $1 FOR UPDATE")
            .bind(code)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err("Failed to lock coupon"))
    }

    async fn lock_coupon_by_id(&mut self, id: CouponId) -> AppResult<Option<Coupon>> {
        sqlx::query_as::<_, Coupon>("SELECT * FROM coupons WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err("Failed to lock coupon"))
    }

    async fn count_customer_coupon_usages(
        &mut self,
        coupon_id: CouponId,
        customer_id: CustomerId,
    ) -> AppResult<i64> {
        sqlx::query_scalar(SELECT_USAGE_COUNT)
            .bind(coupon_id)
            .bind(customer_id)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(db_err("Failed to count coupon usages"))
    }

    async fn find_coupon_usage(&mut self, booking_id: BookingId) -> AppResult<Option<CouponUsage>> {
        sqlx::query_as::<_, CouponUsage>("SELECT * FROM coupon_usages WHERE booking_id = $1")
            .bind(booking_id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(db_err("Failed to find coupon usage"))
    }

    async fn insert_coupon_usage(&mut self, usage: &CouponUsage) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO coupon_usages (id, coupon_id, customer_id, booking_id, discount_amount, used_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(usage.id)
        .bind(usage.coupon_id)
        .bind(usage.customer_id)
        .bind(usage.booking_id)
        .bind(usage.discount_amount)
        .bind(usage.used_at)
        .execute(&mut *self.tx)
        .await
        .map_err(db_err("Failed to insert coupon usage"))?;
        Ok(())
    }

    async fn delete_coupon_usage(&mut self, id: CouponUsageId) -> AppResult<()> {
        sqlx::query("DELETE FROM coupon_usages WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(db_err("Failed to delete coupon usage"))?;
        Ok(())
    }

    async fn increment_coupon_usage(&mut self, id: CouponId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE coupons SET used_count = used_count + 1, updated_at = NOW() \
             WHERE id = $1 AND (max_total_uses IS NULL OR used_count < max_total_uses)",
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(db_err("Failed to increment coupon usage"))?;
        Ok(result.rows_affected() == 1)
    }

    async fn decrement_coupon_usage(&mut self, id: CouponId) -> AppResult<()> {
        sqlx::query(
            "UPDATE coupons SET used_count = GREATEST(used_count - 1, 0), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .execute(&mut *self.tx)
        .await
        .map_err(db_err("Failed to decrement coupon usage"))?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx
            .commit()
            .await
            .map_err(db_err("Failed to commit transaction"))
    }
}
