//! Goals module — habits and targets a user tracks
//!
//! Provides REST endpoints for managing goals. Journal entries may rate
//! progress toward any of the owner's goals.

pub mod handler;
pub mod store;
pub mod types;

pub use handler::{goals_router, GoalsState};
pub use store::GoalStore;
pub use types::Goal;
