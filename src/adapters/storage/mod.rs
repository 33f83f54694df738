//! Storage Adapters
//!
//! Implementations of the `SessionStore` and `DialogueStore` ports.
//!
//! ## Available Adapters
//!
//! - **InMemorySessionStore / InMemoryDialogueStore** - process memory (default, tests)
//! - **RedisSessionStore / RedisDialogueStore** - Redis, survives restarts
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{InMemoryDialogueStore, InMemorySessionStore};
//!
//! let sessions = InMemorySessionStore::new();
//! let dialogues = InMemoryDialogueStore::new();
//! ```

mod in_memory_dialogue_store;
mod in_memory_session_store;
mod redis_dialogue_store;
mod redis_session_store;

pub use in_memory_dialogue_store::InMemoryDialogueStore;
pub use in_memory_session_store::InMemorySessionStore;
pub use redis_dialogue_store::RedisDialogueStore;
pub use redis_session_store::RedisSessionStore;
