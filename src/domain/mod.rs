//! Domain layer containing the bot's types and rules.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (identifiers)
//! - `session` - Authenticated session and bearer token
//! - `dialogue` - Dialogue state machine, input grammar, replies and menus

pub mod dialogue;
pub mod foundation;
pub mod session;
