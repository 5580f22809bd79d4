//! Role and ownership rules for booking operations.

use lodging_entity::booking::Booking;
use lodging_entity::property::PropertySummary;
use lodging_entity::user::UserRole;

use crate::context::ActorContext;
use crate::error::BookingError;

/// The booking's customer, the host of its property, or an admin.
pub(crate) fn ensure_can_view(
    ctx: &ActorContext,
    booking: &Booking,
    property: Option<&PropertySummary>,
) -> Result<(), BookingError> {
    let allowed = match ctx.role {
        UserRole::Admin => true,
        UserRole::Customer => booking.customer_id == ctx.actor_id,
        UserRole::Host => property.is_some_and(|p| p.host_id == ctx.actor_id),
    };
    if allowed {
        Ok(())
    } else {
        Err(BookingError::NotPermitted(
            "You do not have access to this booking".to_string(),
        ))
    }
}

/// The booking's own customer, or an admin.
pub(crate) fn ensure_customer_or_admin(
    ctx: &ActorContext,
    booking: &Booking,
) -> Result<(), BookingError> {
    match ctx.role {
        UserRole::Admin => Ok(()),
        UserRole::Customer if booking.customer_id == ctx.actor_id => Ok(()),
        _ => Err(BookingError::NotPermitted(
            "Only the customer who made the booking can do this".to_string(),
        )),
    }
}

/// A host acting on one of their own properties.
pub(crate) fn ensure_host_of(
    ctx: &ActorContext,
    property: &PropertySummary,
) -> Result<(), BookingError> {
    ctx.require(UserRole::Host, "perform this action")?;
    if property.host_id != ctx.actor_id {
        return Err(BookingError::NotPermitted(
            "You are not the host of this property".to_string(),
        ));
    }
    Ok(())
}
