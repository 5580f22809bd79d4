//! Room type domain entities.

pub mod model;

pub use model::RoomType;
