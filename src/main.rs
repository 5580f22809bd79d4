//! Lodging Server: booking and availability engine over HTTP.
//!
//! Main entry point that loads configuration, selects the store, wires the
//! engine and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use lodging_api::AppState;
use lodging_core::config::{AppConfig, StoreProvider};
use lodging_core::error::AppError;
use lodging_core::traits::{AuditSink, SystemClock};
use lodging_database::migration::run_migrations;
use lodging_database::{
    AuditLogRepository, BookingStore, DatabasePool, MemoryBookingStore, PgBookingStore,
    TracingAuditSink,
};
use lodging_engine::{BookingEngine, StaticHolidayCalendar};

#[tokio::main]
async fn main() {
    let env = std::env::var("LODGING_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!(env = %env, "Configuration loaded");

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Persistence backends selected by `database.provider`.
struct Backends {
    store: Arc<dyn BookingStore>,
    audit: Arc<dyn AuditSink>,
    audit_log: Option<AuditLogRepository>,
    pool: Option<DatabasePool>,
}

async fn connect_backends(config: &AppConfig) -> Result<Backends, AppError> {
    match config.database.provider {
        StoreProvider::Postgres => {
            tracing::info!("Connecting to database...");
            let db = DatabasePool::connect(&config.database).await?;
            if config.database.run_migrations {
                tracing::info!("Running database migrations...");
                run_migrations(db.pool()).await?;
                tracing::info!("Database migrations complete");
            }
            let audit_log = AuditLogRepository::new(db.pool().clone());
            Ok(Backends {
                store: Arc::new(PgBookingStore::new(db.pool().clone())),
                audit: Arc::new(audit_log.clone()),
                audit_log: Some(audit_log),
                pool: Some(db),
            })
        }
        StoreProvider::Memory => {
            tracing::warn!("Using the in-memory store; state is lost on restart and not shared between instances");
            Ok(Backends {
                store: Arc::new(MemoryBookingStore::new()),
                audit: Arc::new(TracingAuditSink),
                audit_log: None,
                pool: None,
            })
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = %config.database.provider,
        "Starting lodging server"
    );

    let backends = connect_backends(&config).await?;
    let holidays = Arc::new(StaticHolidayCalendar::from_config(&config.pricing));
    tracing::info!(
        holidays = config.pricing.holidays.len(),
        currency = %config.pricing.currency,
        "Pricing configured"
    );

    let engine = BookingEngine::new(
        backends.store,
        holidays,
        backends.audit,
        Arc::new(SystemClock),
        &config,
    );
    let mut state = AppState::new(config, engine);
    if let Some(repo) = backends.audit_log {
        state = state.with_audit_log(repo);
    }
    lodging_api::serve(state).await?;

    if let Some(db) = backends.pool {
        db.close().await;
    }
    tracing::info!("Lodging server shut down gracefully");
    Ok(())
}
