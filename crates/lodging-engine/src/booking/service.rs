//! Booking lifecycle orchestration.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, error, info};

use lodging_core::config::BookingConfig;
use lodging_core::error::ErrorKind;
use lodging_core::traits::{AuditSink, Clock};
use lodging_core::types::id::{BookingId, CustomerId};
use lodging_core::types::pagination::{PageRequest, PageResponse};
use lodging_database::{BookingStore, StoreTx};
use lodging_entity::booking::{Booking, BookingStatus, CancellationInfo, PaymentStatus};
use lodging_entity::coupon::CouponUsage;
use lodging_entity::property::PropertySummary;
use lodging_entity::room_type::RoomType;
use lodging_entity::user::UserRole;

use super::access;
use super::code;
use super::request::{
    AdminCancelRequest, CancelBookingRequest, CreateBookingRequest, PaymentUpdate, StatusOverride,
};
use super::state_machine::{self, LifecycleAction, Transition};
use crate::audit::AuditTrail;
use crate::context::ActorContext;
use crate::coupon::service::{RedeemRequest, record_usage, redeem_in_tx, void_in_tx};
use crate::error::BookingError;
use crate::ledger::{InventoryLedger, StayRange};
use crate::lookup;
use crate::pricing::PricingCalculator;
use crate::retry::with_retry;

/// How a status change was requested.
#[derive(Debug, Clone, Copy)]
enum Step<'a> {
    /// An ordinary lifecycle action, with the cancellation reason if any.
    Action(LifecycleAction, Option<&'a str>),
    /// An admin override to any status.
    Override {
        to: BookingStatus,
        note: Option<&'a str>,
        refund: Option<Decimal>,
    },
}

/// Committed result of a status or payment change.
struct Change {
    old: Booking,
    new: Booking,
    voided_usage: Option<CouponUsage>,
}

impl Change {
    fn unchanged(booking: Booking) -> Self {
        Self {
            old: booking.clone(),
            new: booking,
            voided_usage: None,
        }
    }

    fn is_noop(&self) -> bool {
        self.old == self.new
    }
}

/// Creates bookings and moves them through their lifecycle.
///
/// Every mutation runs in one store transaction retried on transient
/// conflicts; audit records are written after commit.
#[derive(Clone)]
pub struct BookingService {
    store: Arc<dyn BookingStore>,
    pricing: Arc<PricingCalculator>,
    audit: AuditTrail,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

impl BookingService {
    /// Create a new booking service.
    pub fn new(
        store: Arc<dyn BookingStore>,
        pricing: Arc<PricingCalculator>,
        audit: Arc<dyn AuditSink>,
        clock: Arc<dyn Clock>,
        config: BookingConfig,
    ) -> Self {
        Self {
            store,
            pricing,
            audit: AuditTrail::new(audit),
            clock,
            config,
        }
    }

    fn today(&self) -> NaiveDate {
        self.clock.today(self.config.utc_offset_minutes)
    }

    // ── Creation ────────────────────────────────────────────────────

    /// Price, optionally discount, and reserve a stay for the calling
    /// customer. The booking is created `confirmed`.
    pub async fn create_booking(
        &self,
        ctx: &ActorContext,
        req: CreateBookingRequest,
    ) -> Result<Booking, BookingError> {
        ctx.require(UserRole::Customer, "create a booking")?;
        if req.rooms_count < 1 {
            return Err(BookingError::InvalidRoomsCount);
        }
        let range = StayRange::new(req.check_in, req.check_out)?;
        if range.check_in() < self.today() {
            return Err(BookingError::InvalidArgument(
                "Check-in date cannot be in the past".to_string(),
            ));
        }

        let room_type =
            lookup::room_type_of(self.store.as_ref(), req.property_id, req.room_type_id).await?;
        lookup::ensure_active(&room_type)?;
        check_rooms_and_guests(&room_type, &req)?;
        let holidays = self.pricing.holidays_for(&range).await;

        let created = with_retry(&self.config, "create_booking", || {
            self.try_create(ctx, &req, &range, &holidays)
        })
        .await;
        let (booking, usage) = match created {
            Ok(created) => created,
            Err(e) => {
                report_failure("create_booking", &e, || {
                    error!(
                        room_type_id = %req.room_type_id,
                        check_in = %req.check_in,
                        check_out = %req.check_out,
                        rooms = req.rooms_count,
                        error = %e,
                        "Booking creation failed"
                    )
                });
                return Err(e);
            }
        };

        info!(
            booking_id = %booking.id,
            booking_code = %booking.booking_code,
            room_type_id = %booking.room_type_id,
            check_in = %booking.check_in,
            check_out = %booking.check_out,
            rooms = booking.rooms_count,
            total = %booking.total_amount,
            "Booking created"
        );
        self.audit.booking_created(&booking, ctx.actor_id).await;
        if let Some(usage) = &usage {
            self.audit.usage_created(usage, ctx.actor_id).await;
        }
        Ok(booking)
    }

    async fn try_create(
        &self,
        ctx: &ActorContext,
        req: &CreateBookingRequest,
        range: &StayRange,
        holidays: &BTreeSet<NaiveDate>,
    ) -> Result<(Booking, Option<CouponUsage>), BookingError> {
        let mut tx = self.store.begin().await?;

        // The room type lock serializes every capacity decision for it.
        let room_type =
            lookup::lock_room_type_of(tx.as_mut(), req.property_id, req.room_type_id).await?;
        lookup::ensure_active(&room_type)?;
        check_rooms_and_guests(&room_type, req)?;
        let quote = self
            .pricing
            .quote(&room_type, range, req.rooms_count, holidays)?;

        let coupon_code = req
            .coupon_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());
        let redemption = match coupon_code {
            Some(code) => {
                let property = tx
                    .find_property(req.property_id)
                    .await?
                    .ok_or(BookingError::PropertyNotFound(req.property_id))?;
                let redeem = RedeemRequest {
                    code,
                    customer_id: ctx.actor_id,
                    property: &property,
                    room_price: quote.total,
                    nights: quote.nights,
                    today: self.today(),
                    minor_unit_digits: self.pricing.config().minor_unit_digits,
                };
                Some(redeem_in_tx(tx.as_mut(), redeem).await?)
            }
            None => None,
        };

        InventoryLedger::ensure_capacity(tx.as_mut(), &room_type, range, req.rooms_count, None)
            .await?;

        let now = self.clock.now();
        let discount = redemption
            .as_ref()
            .map(|r| r.discount)
            .unwrap_or(Decimal::ZERO);
        let nights = i32::try_from(quote.nights)
            .map_err(|_| BookingError::InvalidArgument("Stay is too long".to_string()))?;
        let booking = Booking {
            id: BookingId::new(),
            booking_code: code::generate(range.check_in()),
            customer_id: ctx.actor_id,
            property_id: req.property_id,
            room_type_id: room_type.id,
            check_in: range.check_in(),
            check_out: range.check_out(),
            nights,
            rooms_count: to_i32(req.rooms_count),
            adults: to_i32(req.adults),
            children: to_i32(req.children),
            room_price: quote.total,
            discount_amount: discount,
            total_amount: (quote.total - discount).max(Decimal::ZERO),
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Pending,
            special_requests: req
                .special_requests
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            booked_at: now,
            updated_at: now,
            checked_in_at: None,
            checked_out_at: None,
            cancelled_by: None,
            cancelled_by_role: None,
            cancellation_reason: None,
            cancelled_at: None,
            refund_amount: None,
            admin_note: None,
        };
        tx.insert_booking(&booking).await?;

        let usage = match &redemption {
            Some(r) => Some(record_usage(tx.as_mut(), r, &booking, now).await?),
            None => None,
        };
        tx.commit().await?;
        Ok((booking, usage))
    }

    // ── Lifecycle ───────────────────────────────────────────────────

    /// Confirm a pending booking, claiming its rooms.
    pub async fn confirm_booking(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
    ) -> Result<Booking, BookingError> {
        self.run_step(ctx, booking_id, Step::Action(LifecycleAction::Confirm, None), "confirm_booking")
            .await
    }

    /// Cancel as the booking's customer (before check-in) or the property's
    /// host (with a reason). Cancelling a cancelled booking changes nothing.
    pub async fn cancel_booking(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        req: CancelBookingRequest,
    ) -> Result<Booking, BookingError> {
        let reason = req.reason.as_deref().map(str::trim).filter(|r| !r.is_empty());
        self.run_step(ctx, booking_id, Step::Action(LifecycleAction::Cancel, reason), "cancel_booking")
            .await
    }

    /// Mark the guest as arrived. Host only, on or after the check-in date.
    pub async fn check_in(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
    ) -> Result<Booking, BookingError> {
        self.run_step(ctx, booking_id, Step::Action(LifecycleAction::CheckIn, None), "check_in")
            .await
    }

    /// Mark the stay as finished. Host only.
    pub async fn check_out(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
    ) -> Result<Booking, BookingError> {
        self.run_step(ctx, booking_id, Step::Action(LifecycleAction::CheckOut, None), "check_out")
            .await
    }

    /// Cancel any booking as an admin, recording a reason and, for paid
    /// bookings, the refund.
    pub async fn admin_cancel_booking(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        req: AdminCancelRequest,
    ) -> Result<Booking, BookingError> {
        ctx.require(UserRole::Admin, "cancel any booking")?;
        let reason = req.reason.trim();
        if reason.is_empty() {
            return Err(BookingError::InvalidArgument(
                "A cancellation reason is required".to_string(),
            ));
        }
        let step = Step::Override {
            to: BookingStatus::Cancelled,
            note: Some(reason),
            refund: req.refund_amount,
        };
        self.run_step(ctx, booking_id, step, "admin_cancel_booking").await
    }

    /// Force a booking into any status as an admin. Ordinary guards are
    /// skipped; capacity is still enforced when the booking starts holding
    /// rooms again, and cancellation still voids the coupon.
    pub async fn update_booking_status(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        req: StatusOverride,
    ) -> Result<Booking, BookingError> {
        ctx.require(UserRole::Admin, "override a booking status")?;
        let note = req.note.as_deref().map(str::trim).filter(|n| !n.is_empty());
        let step = Step::Override {
            to: req.status,
            note,
            refund: req.refund_amount,
        };
        self.run_step(ctx, booking_id, step, "update_booking_status").await
    }

    async fn run_step(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        step: Step<'_>,
        operation: &'static str,
    ) -> Result<Booking, BookingError> {
        let change = match with_retry(&self.config, operation, || {
            self.try_step(ctx, booking_id, step)
        })
        .await
        {
            Ok(change) => change,
            Err(e) => {
                report_failure(operation, &e, || {
                    error!(operation, booking_id = %booking_id, error = %e, "Booking update failed")
                });
                return Err(e);
            }
        };
        self.finish(ctx, change).await
    }

    async fn try_step(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        step: Step<'_>,
    ) -> Result<Change, BookingError> {
        let mut tx = self.store.begin().await?;
        let old = tx
            .lock_booking(booking_id)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;
        let property = tx.find_property(old.property_id).await?;

        let transition = match step {
            Step::Action(action, _) => {
                authorize_action(ctx, &old, property.as_ref(), action)?;
                state_machine::next(old.status, action)?
            }
            Step::Override { to, .. } => {
                ctx.require(UserRole::Admin, "override a booking status")?;
                state_machine::admin_override(old.status, to)
            }
        };
        let Transition::Move { to, .. } = transition else {
            return Ok(Change::unchanged(old));
        };
        if let Step::Action(action, reason) = step {
            self.check_guards(ctx, &old, action, reason)?;
        }

        let now = self.clock.now();
        let mut new = old.clone();
        new.status = to;
        new.updated_at = now;

        if transition.claims_inventory() {
            let room_type = tx
                .lock_room_type(old.room_type_id)
                .await?
                .ok_or(BookingError::RoomTypeNotFound(old.room_type_id))?;
            let range = StayRange::new(old.check_in, old.check_out)?;
            InventoryLedger::ensure_capacity(tx.as_mut(), &room_type, &range, old.rooms(), Some(old.id))
                .await?;
        }
        let voided_usage = if transition.voids_coupon() {
            void_in_tx(tx.as_mut(), old.id).await?
        } else {
            None
        };

        match to {
            BookingStatus::CheckedIn => {
                new.checked_in_at.get_or_insert(now);
            }
            BookingStatus::CheckedOut => {
                new.checked_out_at.get_or_insert(now);
            }
            BookingStatus::Cancelled => {
                let (reason, refund) = match step {
                    Step::Action(_, reason) => (reason, None),
                    Step::Override { note, refund, .. } => (note, refund),
                };
                let refund_amount = settle_refund(&mut new, refund)?;
                new.mark_cancelled(
                    CancellationInfo {
                        actor_id: ctx.actor_id,
                        role: ctx.role,
                        reason: reason.map(str::to_string),
                        refund_amount,
                    },
                    now,
                );
            }
            BookingStatus::Pending | BookingStatus::Confirmed => {}
        }
        if old.status == BookingStatus::Cancelled {
            new.cancelled_by = None;
            new.cancelled_by_role = None;
            new.cancellation_reason = None;
            new.cancelled_at = None;
        }
        if let Step::Override { note: Some(note), .. } = step {
            new.admin_note = Some(note.to_string());
        }

        tx.update_booking(&new).await?;
        tx.commit().await?;
        Ok(Change {
            old,
            new,
            voided_usage,
        })
    }

    /// Date and reason rules of ordinary actions. Admin overrides skip them.
    fn check_guards(
        &self,
        ctx: &ActorContext,
        booking: &Booking,
        action: LifecycleAction,
        reason: Option<&str>,
    ) -> Result<(), BookingError> {
        let today = self.today();
        match (action, ctx.role) {
            (LifecycleAction::Cancel, UserRole::Customer) if today >= booking.check_in => {
                Err(BookingError::CancellationWindowClosed {
                    check_in: booking.check_in,
                })
            }
            (LifecycleAction::Cancel, UserRole::Host) if reason.is_none() => Err(
                BookingError::InvalidArgument("A reason is required when a host cancels a booking".to_string()),
            ),
            (LifecycleAction::CheckIn, _) if today < booking.check_in => {
                Err(BookingError::TooEarlyForCheckIn {
                    check_in: booking.check_in,
                })
            }
            _ => Ok(()),
        }
    }

    // ── Payment ─────────────────────────────────────────────────────

    /// Change the payment status as an admin.
    ///
    /// A cancelled booking cannot become paid, and only a paid booking can
    /// be refunded.
    pub async fn update_payment_status(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
        req: PaymentUpdate,
    ) -> Result<Booking, BookingError> {
        ctx.require(UserRole::Admin, "change payment status")?;
        let change = with_retry(&self.config, "update_payment_status", || {
            self.try_payment(booking_id, &req)
        })
        .await?;
        self.finish(ctx, change).await
    }

    async fn try_payment(
        &self,
        booking_id: BookingId,
        req: &PaymentUpdate,
    ) -> Result<Change, BookingError> {
        let mut tx = self.store.begin().await?;
        let old = tx
            .lock_booking(booking_id)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;
        if old.payment_status == req.payment_status {
            return Ok(Change::unchanged(old));
        }

        let mut new = old.clone();
        match req.payment_status {
            PaymentStatus::Paid if old.status == BookingStatus::Cancelled => {
                return Err(BookingError::InvalidArgument(
                    "A cancelled booking cannot be marked as paid".to_string(),
                ));
            }
            PaymentStatus::Refunded if old.payment_status != PaymentStatus::Paid => {
                return Err(BookingError::InvalidArgument(
                    "Only a paid booking can be refunded".to_string(),
                ));
            }
            PaymentStatus::Refunded => {
                settle_refund(&mut new, req.refund_amount.or(Some(old.total_amount)))?;
            }
            _ if old.payment_status == PaymentStatus::Refunded => {
                return Err(BookingError::InvalidArgument(
                    "A refunded payment cannot change status".to_string(),
                ));
            }
            _ => new.payment_status = req.payment_status,
        }
        new.updated_at = self.clock.now();

        tx.update_booking(&new).await?;
        tx.commit().await?;
        Ok(Change {
            old,
            new,
            voided_usage: None,
        })
    }

    async fn finish(&self, ctx: &ActorContext, change: Change) -> Result<Booking, BookingError> {
        if change.is_noop() {
            debug!(booking_id = %change.new.id, status = %change.new.status, "Booking already in requested state");
            return Ok(change.new);
        }
        info!(
            booking_id = %change.new.id,
            from = %change.old.status,
            to = %change.new.status,
            payment_status = %change.new.payment_status,
            actor_id = %ctx.actor_id,
            role = %ctx.role,
            "Booking updated"
        );
        if let Some(usage) = &change.voided_usage {
            self.audit.usage_removed(usage, ctx.actor_id).await;
        }
        self.audit
            .booking_changed(&change.old, &change.new, ctx.actor_id)
            .await;
        Ok(change.new)
    }

    // ── Reads ───────────────────────────────────────────────────────

    /// Fetch a booking visible to the caller.
    pub async fn get_booking(
        &self,
        ctx: &ActorContext,
        booking_id: BookingId,
    ) -> Result<Booking, BookingError> {
        let booking = self
            .store
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| BookingError::BookingNotFound(booking_id.to_string()))?;
        self.ensure_can_view(ctx, &booking).await?;
        Ok(booking)
    }

    /// Fetch a booking by its code.
    pub async fn get_booking_by_code(
        &self,
        ctx: &ActorContext,
        booking_code: &str,
    ) -> Result<Booking, BookingError> {
        let code = booking_code.trim().to_uppercase();
        let booking = self
            .store
            .find_booking_by_code(&code)
            .await?
            .ok_or(BookingError::BookingNotFound(code))?;
        self.ensure_can_view(ctx, &booking).await?;
        Ok(booking)
    }

    /// A customer's bookings, newest first. Customers only see their own.
    pub async fn list_customer_bookings(
        &self,
        ctx: &ActorContext,
        customer_id: CustomerId,
        page: PageRequest,
    ) -> Result<PageResponse<Booking>, BookingError> {
        if !ctx.is_admin() && ctx.actor_id != customer_id {
            return Err(BookingError::NotPermitted(
                "You can only list your own bookings".to_string(),
            ));
        }
        Ok(self.store.list_customer_bookings(customer_id, &page).await?)
    }

    async fn ensure_can_view(&self, ctx: &ActorContext, booking: &Booking) -> Result<(), BookingError> {
        let property: Option<PropertySummary> = match ctx.role {
            UserRole::Host => self.store.find_property(booking.property_id).await?,
            _ => None,
        };
        access::ensure_can_view(ctx, booking, property.as_ref())
    }
}

/// Role and ownership check for an ordinary action.
fn authorize_action(
    ctx: &ActorContext,
    booking: &Booking,
    property: Option<&PropertySummary>,
    action: LifecycleAction,
) -> Result<(), BookingError> {
    match action {
        LifecycleAction::Confirm => access::ensure_customer_or_admin(ctx, booking),
        LifecycleAction::Cancel => match ctx.role {
            UserRole::Host => access::ensure_host_of(ctx, require_property(booking, property)?),
            _ => access::ensure_customer_or_admin(ctx, booking),
        },
        LifecycleAction::CheckIn | LifecycleAction::CheckOut => {
            access::ensure_host_of(ctx, require_property(booking, property)?)
        }
    }
}

fn require_property<'a>(
    booking: &Booking,
    property: Option<&'a PropertySummary>,
) -> Result<&'a PropertySummary, BookingError> {
    property.ok_or(BookingError::PropertyNotFound(booking.property_id))
}

/// Mark a paid booking refunded. Returns the refund recorded, or `None`
/// when nothing was paid.
fn settle_refund(booking: &mut Booking, refund: Option<Decimal>) -> Result<Option<Decimal>, BookingError> {
    if booking.payment_status != PaymentStatus::Paid {
        return Ok(None);
    }
    let amount = refund.unwrap_or(booking.total_amount);
    if amount < Decimal::ZERO || amount > booking.total_amount {
        return Err(BookingError::InvalidArgument(format!(
            "Refund must be between 0 and {}",
            booking.total_amount
        )));
    }
    booking.payment_status = PaymentStatus::Refunded;
    booking.refund_amount = Some(amount);
    Ok(Some(amount))
}

/// Room count against inventory and guest counts against per-room limits
/// scaled by the number of rooms.
fn check_rooms_and_guests(room_type: &RoomType, req: &CreateBookingRequest) -> Result<(), BookingError> {
    if req.rooms_count > room_type.capacity() {
        return Err(BookingError::ExceedsCapacity {
            requested: req.rooms_count,
            total_rooms: room_type.capacity(),
        });
    }
    if req.adults < 1 {
        return Err(BookingError::InvalidArgument(
            "At least one adult is required".to_string(),
        ));
    }
    let rooms = i64::from(req.rooms_count);
    let limits = [
        ("adults", i64::from(req.adults), i64::from(room_type.max_adults)),
        ("children", i64::from(req.children), i64::from(room_type.max_children)),
        (
            "guests",
            i64::from(req.adults) + i64::from(req.children),
            i64::from(room_type.max_guests),
        ),
    ];
    for (what, requested, per_room) in limits {
        let max = per_room * rooms;
        if requested > max {
            return Err(BookingError::GuestLimitExceeded(format!(
                "{requested} {what} requested but {} room(s) of this type hold at most {max}",
                req.rooms_count
            )));
        }
    }
    Ok(())
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Log unexpected failures with the caller-supplied context; client and
/// availability errors are expected outcomes.
fn report_failure(operation: &'static str, err: &BookingError, log: impl FnOnce()) {
    match err.kind() {
        ErrorKind::Database | ErrorKind::Internal | ErrorKind::Serialization | ErrorKind::Configuration => {
            log()
        }
        kind => debug!(operation, kind = %kind, error = %err, "Booking operation rejected"),
    }
}
