//! Room type entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lodging_core::error::AppError;
use lodging_core::types::id::{PropertyId, RoomTypeId};

/// A bookable unit category within a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct RoomType {
    /// Unique room type identifier.
    pub id: RoomTypeId,
    /// Owning property.
    pub property_id: PropertyId,
    /// Display name.
    pub name: String,
    /// Fixed inventory ceiling.
    pub total_rooms: i32,
    /// Nightly price on ordinary nights.
    pub base_price: Decimal,
    /// Nightly price on Saturday and Sunday nights, when set.
    pub weekend_price: Option<Decimal>,
    /// Nightly price on holidays, when set.
    pub holiday_price: Option<Decimal>,
    /// Percentage off for stays reaching the weekly threshold.
    pub weekly_discount_percent: Decimal,
    /// Percentage off for stays reaching the monthly threshold.
    pub monthly_discount_percent: Decimal,
    /// Maximum adults per room.
    pub max_adults: i32,
    /// Maximum children per room.
    pub max_children: i32,
    /// Maximum total guests per room.
    pub max_guests: i32,
    /// Whether the room type can be booked.
    pub is_active: bool,
    /// When the room type was created.
    pub created_at: DateTime<Utc>,
    /// When the room type was last updated.
    pub updated_at: DateTime<Utc>,
}

impl RoomType {
    /// Inventory ceiling as an unsigned count.
    pub fn capacity(&self) -> u32 {
        u32::try_from(self.total_rooms).unwrap_or(0)
    }

    /// Check the invariants hosts must respect when configuring a room type.
    pub fn check_invariants(&self) -> Result<(), AppError> {
        if self.total_rooms < 1 {
            return Err(AppError::validation("total_rooms must be at least 1"));
        }
        if self.max_guests < self.max_adults {
            return Err(AppError::validation(
                "max_guests must be greater than or equal to max_adults",
            ));
        }
        if self.max_adults < 1 || self.max_children < 0 {
            return Err(AppError::validation(
                "max_adults must be positive and max_children non-negative",
            ));
        }
        let hundred = Decimal::ONE_HUNDRED;
        for (name, pct) in [
            ("weekly_discount_percent", self.weekly_discount_percent),
            ("monthly_discount_percent", self.monthly_discount_percent),
        ] {
            if pct < Decimal::ZERO || pct > hundred {
                return Err(AppError::validation(format!(
                    "{name} must be within [0, 100]"
                )));
            }
        }
        let prices = [Some(self.base_price), self.weekend_price, self.holiday_price];
        if prices.iter().flatten().any(|p| *p < Decimal::ZERO) {
            return Err(AppError::validation("nightly prices must not be negative"));
        }
        Ok(())
    }
}
