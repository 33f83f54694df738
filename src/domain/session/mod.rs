//! Authenticated session of a chat participant.
//!
//! A session exists once a register/auth/restore flow has returned a token.
//! At most one token is held per user; a later login overwrites it.

mod token;

pub use token::{BearerToken, Session};
