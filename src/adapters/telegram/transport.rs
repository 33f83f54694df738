//! Telegram implementation of the ChatTransport port.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, InputFile, ParseMode};

use crate::domain::dialogue::{Keyboard, TextFormat};
use crate::domain::foundation::UserId;
use crate::ports::{ChatTransport, TransportError};

/// Sends replies through the Telegram Bot API.
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Private chats share their id with the user.
fn chat_id(user_id: UserId) -> ChatId {
    ChatId(user_id.as_i64())
}

pub(super) fn inline_keyboard(keyboard: &Keyboard) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard.rows.iter().map(|row| {
        row.iter()
            .map(|button| InlineKeyboardButton::callback(button.label.clone(), button.callback.clone()))
            .collect::<Vec<_>>()
    }))
}

fn delivery_error(err: teloxide::RequestError) -> TransportError {
    TransportError::Delivery(err.to_string())
}

#[async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(
        &self,
        user_id: UserId,
        text: &str,
        format: TextFormat,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.send_message(chat_id(user_id), text);
        if format == TextFormat::Html {
            request = request.parse_mode(ParseMode::Html);
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(inline_keyboard(keyboard));
        }
        request.await.map_err(delivery_error)?;
        Ok(())
    }

    async fn send_photo(
        &self,
        user_id: UserId,
        image: &[u8],
        caption: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TransportError> {
        let photo = InputFile::memory(image.to_vec()).file_name("captcha.png");
        let mut request = self
            .bot
            .send_photo(chat_id(user_id), photo)
            .caption(caption);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(inline_keyboard(keyboard));
        }
        request.await.map_err(delivery_error)?;
        Ok(())
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TransportError> {
        self.bot
            .answer_callback_query(callback_id)
            .await
            .map_err(delivery_error)?;
        Ok(())
    }
}
