//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use lodging_core::config::AppConfig;
use lodging_database::AuditLogRepository;
use lodging_engine::BookingEngine;

/// Shared state passed to every handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Ledger, pricing, coupon and booking services.
    pub engine: BookingEngine,
    /// Booking history; only present with the Postgres audit log.
    pub audit_log: Option<Arc<AuditLogRepository>>,
}

impl AppState {
    /// Create the state from a configuration and a wired engine.
    pub fn new(config: AppConfig, engine: BookingEngine) -> Self {
        Self {
            config: Arc::new(config),
            engine,
            audit_log: None,
        }
    }

    /// Serve booking history from the Postgres audit log.
    pub fn with_audit_log(mut self, repo: AuditLogRepository) -> Self {
        self.audit_log = Some(Arc::new(repo));
        self
    }
}
