//! Audit log repository writing to the `audit_log` table.

use async_trait::async_trait;
use sqlx::PgPool;

use lodging_core::result::AppResult;
use lodging_core::traits::audit::{AuditRecord, AuditSink};
use lodging_core::types::pagination::{PageRequest, PageResponse};
use lodging_entity::audit::AuditLogEntry;

use crate::error::db_err;

/// Repository for audit log entries.
#[derive(Debug, Clone)]
pub struct AuditLogRepository {
    pool: PgPool,
}

impl AuditLogRepository {
    /// Create a new audit log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// History of one row, newest first.
    pub async fn find_for_record(
        &self,
        table_name: &str,
        record_id: &str,
        page: &PageRequest,
    ) -> AppResult<PageResponse<AuditLogEntry>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM audit_log WHERE table_name = $1 AND record_id = $2",
        )
        .bind(table_name)
        .bind(record_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to count audit entries"))?;

        let entries = sqlx::query_as::<_, AuditLogEntry>(
            "SELECT * FROM audit_log WHERE table_name = $1 AND record_id = $2 \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(table_name)
        .bind(record_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to load audit entries"))?;

        Ok(PageResponse::new(entries, page, total.max(0) as u64))
    }
}

#[async_trait]
impl AuditSink for AuditLogRepository {
    async fn record(&self, record: AuditRecord) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO audit_log (table_name, record_id, action, old_values, new_values, actor_id) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&record.table)
        .bind(&record.record_id)
        .bind(record.action.as_str())
        .bind(&record.old_values)
        .bind(&record.new_values)
        .bind(record.actor_id)
        .execute(&self.pool)
        .await
        .map_err(db_err("Failed to create audit entry"))?;
        Ok(())
    }
}
