//! In-Memory Session Store Adapter
//!
//! Keeps tokens in process memory. Sessions are lost on restart.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::session::{BearerToken, Session};
use crate::ports::{SessionStore, StoreError};

/// In-memory storage for user sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    tokens: Arc<RwLock<HashMap<UserId, BearerToken>>>,
}

impl InMemorySessionStore {
    /// Create a new in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of stored sessions
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: UserId) -> Result<Option<Session>, StoreError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .get(&user_id)
            .cloned()
            .map(|token| Session::new(user_id, token)))
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(session.user_id, session.token.clone());
        Ok(())
    }

    async fn delete(&self, user_id: UserId) -> Result<(), StoreError> {
        self.tokens.write().await.remove(&user_id);
        Ok(())
    }
}
