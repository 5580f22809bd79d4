//! Audit-log sink invoked after each committed mutation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;
use crate::types::id::UserId;

/// Kind of mutation being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

impl AuditAction {
    /// Return the action as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

/// One committed mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Table the mutation touched (e.g. `"bookings"`).
    pub table: String,
    /// Primary key of the affected row.
    pub record_id: String,
    /// Mutation kind.
    pub action: AuditAction,
    /// Row before the mutation.
    pub old_values: Option<serde_json::Value>,
    /// Row after the mutation.
    pub new_values: Option<serde_json::Value>,
    /// User who caused the mutation, when known.
    pub actor_id: Option<UserId>,
}

/// Destination for audit records.
///
/// Sinks are called after the transaction has committed, so a failing
/// sink never rolls back a booking; callers log and continue.
#[async_trait]
pub trait AuditSink: Send + Sync + 'static {
    /// Persist a single audit record.
    async fn record(&self, record: AuditRecord) -> AppResult<()>;

    /// Record an insert.
    async fn log_insert(
        &self,
        table: &str,
        record_id: String,
        new_values: serde_json::Value,
        actor_id: Option<UserId>,
    ) -> AppResult<()> {
        self.record(AuditRecord {
            table: table.to_string(),
            record_id,
            action: AuditAction::Insert,
            old_values: None,
            new_values: Some(new_values),
            actor_id,
        })
        .await
    }

    /// Record an update.
    async fn log_update(
        &self,
        table: &str,
        record_id: String,
        old_values: serde_json::Value,
        new_values: serde_json::Value,
        actor_id: Option<UserId>,
    ) -> AppResult<()> {
        self.record(AuditRecord {
            table: table.to_string(),
            record_id,
            action: AuditAction::Update,
            old_values: Some(old_values),
            new_values: Some(new_values),
            actor_id,
        })
        .await
    }

    /// Record a delete.
    async fn log_delete(
        &self,
        table: &str,
        record_id: String,
        old_values: serde_json::Value,
        actor_id: Option<UserId>,
    ) -> AppResult<()> {
        self.record(AuditRecord {
            table: table.to_string(),
            record_id,
            action: AuditAction::Delete,
            old_values: Some(old_values),
            new_values: None,
            actor_id,
        })
        .await
    }
}
