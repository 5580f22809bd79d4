//! # lodging-entity
//!
//! Domain entity models for the lodging booking engine. Every struct in this
//! crate represents a database table row or a domain value object. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod audit;
pub mod booking;
pub mod coupon;
pub mod property;
pub mod room_type;
pub mod user;
