//! FoodSight server: HTTP surface over the insight engine and the
//! conversation store.

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
