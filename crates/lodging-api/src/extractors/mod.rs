//! Custom Axum extractors.

pub mod actor;
pub mod pagination;

pub use actor::Actor;
pub use pagination::PaginationParams;
