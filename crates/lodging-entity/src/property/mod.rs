//! Property projection consumed by the engine.

pub mod model;

pub use model::PropertySummary;
