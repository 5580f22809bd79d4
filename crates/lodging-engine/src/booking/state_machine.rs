//! Booking status transition table.
//!
//! ```text
//! pending   --confirm--> confirmed --check_in--> checked_in --check_out--> checked_out
//!    |                      |
//!    +--------cancel--------+-----> cancelled
//! ```
//!
//! Admins may override to any status; the service then applies the side
//! effects the target status implies.

use std::fmt;

use serde::{Deserialize, Serialize};

use lodging_entity::booking::BookingStatus;

use crate::error::BookingError;

/// An ordinary lifecycle step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    Confirm,
    Cancel,
    CheckIn,
    CheckOut,
}

impl LifecycleAction {
    /// Verb used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::Cancel => "cancel",
            Self::CheckIn => "check in",
            Self::CheckOut => "check out",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of looking up a move in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Change to the given status.
    Move {
        from: BookingStatus,
        to: BookingStatus,
    },
    /// Already in the target state; nothing to do.
    Unchanged,
}

impl Transition {
    fn between(from: BookingStatus, to: BookingStatus) -> Self {
        if from == to {
            Self::Unchanged
        } else {
            Self::Move { from, to }
        }
    }

    /// The booking starts holding rooms.
    pub fn claims_inventory(&self) -> bool {
        matches!(self, Self::Move { from, to } if !from.occupies_inventory() && to.occupies_inventory())
    }

    /// Moving into `cancelled` gives the coupon redemption back.
    pub fn voids_coupon(&self) -> bool {
        matches!(self, Self::Move { to: BookingStatus::Cancelled, .. })
    }
}

/// Where `action` takes a booking in `from`.
pub fn next(from: BookingStatus, action: LifecycleAction) -> Result<Transition, BookingError> {
    use BookingStatus::*;
    use LifecycleAction::*;

    let to = match (from, action) {
        (Pending, Confirm) | (Confirmed, Confirm) => Confirmed,
        (Pending, Cancel) | (Confirmed, Cancel) | (Cancelled, Cancel) => Cancelled,
        (Confirmed, CheckIn) => CheckedIn,
        (CheckedIn, CheckOut) => CheckedOut,
        _ => {
            return Err(BookingError::IllegalTransition {
                from,
                action: action.to_string(),
            });
        }
    };
    Ok(Transition::between(from, to))
}

/// An admin override; every move is allowed.
pub fn admin_override(from: BookingStatus, to: BookingStatus) -> Transition {
    Transition::between(from, to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn test_ordinary_path() {
        assert_eq!(
            next(Confirmed, LifecycleAction::CheckIn).unwrap(),
            Transition::Move { from: Confirmed, to: CheckedIn }
        );
        assert_eq!(
            next(CheckedIn, LifecycleAction::CheckOut).unwrap(),
            Transition::Move { from: CheckedIn, to: CheckedOut }
        );
        assert_eq!(
            next(Pending, LifecycleAction::Confirm).unwrap(),
            Transition::Move { from: Pending, to: Confirmed }
        );
    }

    #[test]
    fn test_cancelling_twice_is_unchanged() {
        assert_eq!(next(Cancelled, LifecycleAction::Cancel).unwrap(), Transition::Unchanged);
    }

    #[test]
    fn test_illegal_moves() {
        for (from, action) in [
            (Pending, LifecycleAction::CheckIn),
            (CheckedIn, LifecycleAction::Cancel),
            (CheckedOut, LifecycleAction::Cancel),
            (Cancelled, LifecycleAction::Confirm),
            (Confirmed, LifecycleAction::CheckOut),
            (CheckedOut, LifecycleAction::CheckIn),
        ] {
            assert!(
                matches!(next(from, action), Err(BookingError::IllegalTransition { .. })),
                "{from} / {action} should be rejected"
            );
        }
    }

    #[test]
    fn test_side_effects() {
        let cancel = admin_override(CheckedIn, Cancelled);
        assert!(cancel.voids_coupon());
        assert!(!cancel.claims_inventory());

        let revive = admin_override(Cancelled, Confirmed);
        assert!(revive.claims_inventory());
        assert!(!revive.voids_coupon());

        let finish = admin_override(CheckedIn, CheckedOut);
        assert!(!finish.claims_inventory());
        assert!(!finish.voids_coupon());

        assert_eq!(admin_override(Pending, Pending), Transition::Unchanged);
        assert!(!Transition::Unchanged.claims_inventory());
    }
}
