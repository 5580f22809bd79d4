//! Audit sink that keeps records in memory.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use lodging_core::result::AppResult;
use lodging_core::traits::audit::{AuditRecord, AuditSink};

/// Collects records for later inspection.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl MemoryAuditSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record written so far, oldest first.
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().await.clone()
    }

    /// Records for one table.
    pub async fn records_for(&self, table: &str) -> Vec<AuditRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.table == table)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn record(&self, record: AuditRecord) -> AppResult<()> {
        self.records.lock().await.push(record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lodging_core::traits::audit::AuditAction;

    #[tokio::test]
    async fn test_helpers_fill_old_and_new_values() {
        let sink = MemoryAuditSink::new();
        sink.log_insert("bookings", "b1".into(), serde_json::json!({"a": 1}), None)
            .await
            .unwrap();
        sink.log_update(
            "bookings",
            "b1".into(),
            serde_json::json!({"a": 1}),
            serde_json::json!({"a": 2}),
            None,
        )
        .await
        .unwrap();
        sink.log_delete("coupon_usages", "u1".into(), serde_json::json!({}), None)
            .await
            .unwrap();

        let bookings = sink.records_for("bookings").await;
        assert_eq!(bookings.len(), 2);
        assert_eq!(bookings[0].action, AuditAction::Insert);
        assert!(bookings[0].old_values.is_none());
        assert_eq!(bookings[1].action, AuditAction::Update);
        assert_eq!(sink.records().await.len(), 3);
    }
}
