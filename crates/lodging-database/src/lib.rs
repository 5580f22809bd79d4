//! # lodging-database
//!
//! PostgreSQL connection management, the transactional persistence
//! interface used by the booking engine, and its two implementations:
//! a Postgres store using row-level locks and an in-memory store for
//! single-node deployments and tests.

pub mod audit;
pub mod connection;
pub mod error;
pub mod migration;
pub mod store;

pub use audit::{AuditLogRepository, MemoryAuditSink, TracingAuditSink};
pub use connection::DatabasePool;
pub use store::{BookingStore, MemoryBookingStore, OccupiedStay, PgBookingStore, StoreTx};
