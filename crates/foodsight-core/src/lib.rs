//! FoodSight Core: shared error type and configuration.

pub mod config;
pub mod error;

pub use config::{DataPaths, FoodSightConfig, StoreBackend};
pub use error::{Error, Result};
