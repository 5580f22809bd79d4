//! Booking and payment status enumerations.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use lodging_core::error::AppError;

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Reserved state; never produced by booking creation.
    Pending,
    /// Inventory is held.
    Confirmed,
    /// Guest has arrived.
    CheckedIn,
    /// Stay has ended.
    #[serde(alias = "completed")]
    CheckedOut,
    /// Booking was cancelled.
    Cancelled,
}

impl BookingStatus {
    /// All states, in lifecycle order.
    pub const ALL: [BookingStatus; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::CheckedIn,
        Self::CheckedOut,
        Self::Cancelled,
    ];

    /// Whether a booking in this state counts toward the inventory ledger.
    pub fn occupies_inventory(&self) -> bool {
        matches!(self, Self::Confirmed | Self::CheckedIn)
    }

    /// Check if the booking is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "checked_in" => Ok(Self::CheckedIn),
            "checked_out" | "completed" => Ok(Self::CheckedOut),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(AppError::validation(format!(
                "Unknown booking status '{other}'"
            ))),
        }
    }
}

/// Payment state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not yet paid.
    Pending,
    /// Paid in full.
    Paid,
    /// Payment attempt failed.
    Failed,
    /// Money returned to the customer.
    Refunded,
}

impl PaymentStatus {
    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(AppError::validation(format!(
                "Unknown payment status '{other}'"
            ))),
        }
    }
}
