//! Redis-backed session store for deployments that keep tokens across
//! restarts.
//!
//! Each session is a plain string key `symbio:session:{user_id}` holding
//! the bearer token.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::UserId;
use crate::domain::session::{BearerToken, Session};
use crate::ports::{SessionStore, StoreError};

const KEY_PREFIX: &str = "symbio:session";

pub(super) fn session_key(user_id: UserId) -> String {
    format!("{}:{}", KEY_PREFIX, user_id)
}

/// Redis-backed session store
#[derive(Clone)]
pub struct RedisSessionStore {
    conn: MultiplexedConnection,
}

impl RedisSessionStore {
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn get(&self, user_id: UserId) -> Result<Option<Session>, StoreError> {
        let mut conn = self.conn.clone();

        let token: Option<String> = conn
            .get(session_key(user_id))
            .await
            .map_err(|e: redis::RedisError| StoreError::Unavailable(e.to_string()))?;

        Ok(token
            .filter(|token| !token.is_empty())
            .map(|token| Session::new(user_id, BearerToken::new(token))))
    }

    async fn set(&self, session: &Session) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        conn.set::<_, _, ()>(session_key(session.user_id), session.token.expose())
            .await
            .map_err(|e: redis::RedisError| StoreError::Unavailable(e.to_string()))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();

        conn.del::<_, ()>(session_key(user_id))
            .await
            .map_err(|e: redis::RedisError| StoreError::Unavailable(e.to_string()))
    }
}
