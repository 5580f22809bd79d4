//! Audit log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lodging_core::types::id::{AuditLogId, UserId};

/// An immutable audit log row written after a committed mutation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLogEntry {
    /// Unique audit entry identifier.
    pub id: AuditLogId,
    /// Table that was mutated (e.g. `"bookings"`, `"coupon_usages"`).
    pub table_name: String,
    /// Primary key of the mutated row.
    pub record_id: String,
    /// `"insert"`, `"update"` or `"delete"`.
    pub action: String,
    /// Row before the mutation.
    pub old_values: Option<serde_json::Value>,
    /// Row after the mutation.
    pub new_values: Option<serde_json::Value>,
    /// The user who caused the mutation.
    pub actor_id: Option<UserId>,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}
