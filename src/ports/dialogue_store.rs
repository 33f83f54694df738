//! Dialogue Store Port - Interface for in-progress dialogue state.
//!
//! Holds at most one [`DialogueState`] per user. Setting a state replaces
//! whatever the user had before; there is no merge.

use async_trait::async_trait;

use super::StoreError;
use crate::domain::dialogue::DialogueState;
use crate::domain::foundation::UserId;

/// Port for storing the active dialogue of each user
#[async_trait]
pub trait DialogueStore: Send + Sync {
    /// Load the active dialogue of a user
    async fn get(&self, user_id: UserId) -> Result<Option<DialogueState>, StoreError>;

    /// Store a dialogue, keyed by `state.user_id`, discarding any previous one
    async fn set(&self, state: &DialogueState) -> Result<(), StoreError>;

    /// End the active dialogue of a user (no-op if absent)
    async fn delete(&self, user_id: UserId) -> Result<(), StoreError>;
}
