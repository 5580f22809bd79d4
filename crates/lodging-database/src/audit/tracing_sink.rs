//! Audit sink that emits records as structured log events.

use async_trait::async_trait;

use lodging_core::result::AppResult;
use lodging_core::traits::audit::{AuditRecord, AuditSink};

/// Writes every record to the `audit` tracing target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, record: AuditRecord) -> AppResult<()> {
        let old_values = record.old_values.map(|v| v.to_string());
        let new_values = record.new_values.map(|v| v.to_string());
        tracing::info!(
            target: "audit",
            table = %record.table,
            record_id = %record.record_id,
            action = record.action.as_str(),
            actor_id = ?record.actor_id,
            old_values = old_values.as_deref(),
            new_values = new_values.as_deref(),
            "Committed mutation"
        );
        Ok(())
    }
}
