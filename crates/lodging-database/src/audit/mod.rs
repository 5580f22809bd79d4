//! Audit sink implementations.

pub mod memory;
pub mod postgres;
pub mod tracing_sink;

pub use memory::MemoryAuditSink;
pub use postgres::AuditLogRepository;
pub use tracing_sink::TracingAuditSink;
