//! Application layer - handlers and per-user serialization.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
mod user_locks;

pub use handlers::{ChatEventHandler, DialogueController, DialogueResult};
pub use user_locks::{UserGuard, UserLocks};
