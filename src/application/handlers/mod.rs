//! Application handlers.
//!
//! `ChatEventHandler` receives chat events and delegates to
//! `DialogueController`, which owns the conversation rules.

mod chat_events;
pub mod dialogue;

pub use chat_events::ChatEventHandler;
pub use dialogue::{DialogueController, DialogueResult};
