//! # lodging-api
//!
//! HTTP API layer for the lodging booking engine built on Axum.
//!
//! Exposes availability, pricing, booking lifecycle and coupon endpoints,
//! the actor extractor, request DTOs, and the mapping from engine errors to
//! HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::ApiError;
pub use state::AppState;
