//! Post-commit audit records for engine mutations.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use lodging_core::traits::AuditSink;
use lodging_core::types::id::UserId;
use lodging_entity::booking::Booking;
use lodging_entity::coupon::CouponUsage;

const BOOKINGS: &str = "bookings";
const COUPON_USAGES: &str = "coupon_usages";

/// Writes audit records after a transaction has committed. A failing sink
/// is logged and never turns a committed change into an error.
#[derive(Clone)]
pub(crate) struct AuditTrail {
    sink: Arc<dyn AuditSink>,
}

fn to_json<T: Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

impl AuditTrail {
    pub(crate) fn new(sink: Arc<dyn AuditSink>) -> Self {
        Self { sink }
    }

    pub(crate) async fn booking_created(&self, booking: &Booking, actor: UserId) {
        let result = self
            .sink
            .log_insert(BOOKINGS, booking.id.to_string(), to_json(booking), Some(actor))
            .await;
        if let Err(e) = result {
            warn!(booking_id = %booking.id, error = %e, "Failed to audit booking insert");
        }
    }

    pub(crate) async fn booking_changed(&self, old: &Booking, new: &Booking, actor: UserId) {
        let result = self
            .sink
            .log_update(
                BOOKINGS,
                new.id.to_string(),
                to_json(old),
                to_json(new),
                Some(actor),
            )
            .await;
        if let Err(e) = result {
            warn!(booking_id = %new.id, error = %e, "Failed to audit booking update");
        }
    }

    pub(crate) async fn usage_created(&self, usage: &CouponUsage, actor: UserId) {
        let result = self
            .sink
            .log_insert(COUPON_USAGES, usage.id.to_string(), to_json(usage), Some(actor))
            .await;
        if let Err(e) = result {
            warn!(booking_id = %usage.booking_id, error = %e, "Failed to audit coupon usage insert");
        }
    }

    pub(crate) async fn usage_removed(&self, usage: &CouponUsage, actor: UserId) {
        let result = self
            .sink
            .log_delete(COUPON_USAGES, usage.id.to_string(), to_json(usage), Some(actor))
            .await;
        if let Err(e) = result {
            warn!(booking_id = %usage.booking_id, error = %e, "Failed to audit coupon usage delete");
        }
    }
}
