//! FoodSight Data: the immutable business dataset every answer is computed from.
//!
//! The dataset is authored as literal fixtures for Alimentos del Valle and is
//! built once at startup, then shared by reference. Aggregates are plain
//! sums, filters and rankings over those fixtures.

pub mod aggregates;
pub mod fixtures;
pub mod types;

pub use types::*;
