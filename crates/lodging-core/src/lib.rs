//! # lodging-core
//!
//! Core crate for the lodging booking engine. Contains configuration
//! schemas, typed identifiers, pagination types, the collaborator traits
//! (holiday calendar, audit sink, clock), and the unified error system.
//!
//! This crate has **no** internal dependencies on other lodging crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
