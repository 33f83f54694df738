//! Foundation module - Shared domain primitives.
//!
//! Contains the identifiers that form the vocabulary of the bot domain.

mod ids;

pub use ids::UserId;
