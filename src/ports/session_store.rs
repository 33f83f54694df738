//! Session Store Port - Interface for per-user bearer tokens.
//!
//! A pure lookup table from user id to the token issued by the remote API.
//! Implementations must keep users independent: operating on one user id
//! never touches another user's entry.

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::session::Session;

/// Errors that can occur in the session and dialogue stores
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to serialize entry: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize entry: {0}")]
    DeserializationFailed(String),
}

/// Port for storing the session of each user
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session of a user, if one exists
    async fn get(&self, user_id: UserId) -> Result<Option<Session>, StoreError>;

    /// Store a session, replacing any previous token of the same user
    async fn set(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove the session of a user (no-op if absent)
    async fn delete(&self, user_id: UserId) -> Result<(), StoreError>;
}
