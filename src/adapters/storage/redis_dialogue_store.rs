//! Redis-backed dialogue store.
//!
//! Dialogues are stored as JSON under `symbio:dialogue:{user_id}` with an
//! expiry, so abandoned flows eventually disappear on their own.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::dialogue::DialogueState;
use crate::domain::foundation::UserId;
use crate::ports::{DialogueStore, StoreError};

const KEY_PREFIX: &str = "symbio:dialogue";

fn dialogue_key(user_id: UserId) -> String {
    format!("{}:{}", KEY_PREFIX, user_id)
}

fn encode(state: &DialogueState) -> Result<String, StoreError> {
    serde_json::to_string(state).map_err(|e| StoreError::SerializationFailed(e.to_string()))
}

fn decode(json: &str) -> Result<DialogueState, StoreError> {
    serde_json::from_str(json).map_err(|e| StoreError::DeserializationFailed(e.to_string()))
}

/// Redis-backed dialogue store
#[derive(Clone)]
pub struct RedisDialogueStore {
    conn: MultiplexedConnection,
    ttl: Duration,
}

impl RedisDialogueStore {
    /// Create a store whose entries expire after one hour
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            ttl: Duration::from_secs(3600),
        }
    }

    /// Set how long an untouched dialogue is kept
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

#[async_trait]
impl DialogueStore for RedisDialogueStore {
    async fn get(&self, user_id: UserId) -> Result<Option<DialogueState>, StoreError> {
        let mut conn = self.conn.clone();

        let json: Option<String> = conn
            .get(dialogue_key(user_id))
            .await
            .map_err(|e: redis::RedisError| StoreError::Unavailable(e.to_string()))?;

        json.as_deref().map(decode).transpose()
    }

    async fn set(&self, state: &DialogueState) -> Result<(), StoreError> {
        let json = encode(state)?;
        let mut conn = self.conn.clone();

        // SET key value EX ttl
        redis::cmd("SET")
            .arg(dialogue_key(state.user_id))
            .arg(json)
            .arg("EX")
            .arg(self.ttl.as_secs().max(1))
            .query_async::<_, ()>(&mut conn)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(dialogue_key(user_id))
            .await
            .map_err(|e: redis::RedisError| StoreError::Unavailable(e.to_string()))
    }
}
