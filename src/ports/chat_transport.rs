//! Chat Transport Port - Outgoing side of the chat client.
//!
//! The dialogue core only needs three primitives: send a text message,
//! send a photo with a caption, and acknowledge a button press. Updates
//! are received by the transport adapter, which calls into the
//! application layer.
//!
//! Conversations are private chats, so a user id doubles as the chat id.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::dialogue::{Keyboard, TextFormat};
use crate::domain::foundation::UserId;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Failed to deliver message: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(
        &self,
        user_id: UserId,
        text: &str,
        format: TextFormat,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError>;

    async fn send_photo(
        &self,
        user_id: UserId,
        image: &[u8],
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError>;

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError>;
}
