//! Read-only property summary.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lodging_core::types::id::{PropertyId, UserId};

/// The slice of a property the engine needs: who hosts it and what a
/// coupon scope can match against. Properties are maintained elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PropertySummary {
    /// Property identifier.
    pub id: PropertyId,
    /// Host who owns the property.
    pub host_id: UserId,
    /// Property type (e.g. `"hotel"`, `"villa"`, `"homestay"`).
    pub property_type: String,
    /// City the property is located in.
    pub city: String,
}
