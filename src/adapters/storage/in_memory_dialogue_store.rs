//! In-Memory Dialogue Store Adapter
//!
//! Keeps in-progress dialogues in process memory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::DialogueState;
use crate::domain::foundation::UserId;
use crate::ports::{DialogueStore, StoreError};

/// In-memory storage for dialogue state
#[derive(Debug, Clone, Default)]
pub struct InMemoryDialogueStore {
    states: Arc<RwLock<HashMap<UserId, DialogueState>>>,
}

impl InMemoryDialogueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of active dialogues
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }
}

#[async_trait]
impl DialogueStore for InMemoryDialogueStore {
    async fn get(&self, user_id: UserId) -> Result<Option<DialogueState>, StoreError> {
        Ok(self.states.read().await.get(&user_id).cloned())
    }

    async fn set(&self, state: &DialogueState) -> Result<(), StoreError> {
        let mut states = self.states.write().await;
        states.insert(state.user_id, state.clone());
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> Result<(), StoreError> {
        self.states.write().await.remove(&user_id);
        Ok(())
    }
}
