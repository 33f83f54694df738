//! Telegram update dispatch.
//!
//! Long-polls the Bot API and forwards `/start`, button presses and free
//! text to the `ChatEventHandler`. Updates of different chats are handled
//! concurrently by the dispatcher; per-user ordering is enforced by the
//! handler.

use std::sync::Arc;
use teloxide::dispatching::UpdateFilterExt;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::Update;

use crate::application::ChatEventHandler;
use crate::domain::foundation::UserId;

/// What an incoming text message asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEvent<'a> {
    Start,
    /// Commands other than `/start` are ignored.
    UnknownCommand,
    FreeText(&'a str),
}

/// Classifies a message text. `/start@botname` and `/start payload`
/// count as `/start`.
pub fn classify_text(text: &str) -> TextEvent<'_> {
    let Some(command) = text.trim_start().strip_prefix('/') else {
        return TextEvent::FreeText(text);
    };
    let name = command
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .split('@')
        .next()
        .unwrap_or_default();
    if name.eq_ignore_ascii_case("start") {
        TextEvent::Start
    } else {
        TextEvent::UnknownCommand
    }
}

/// Runs the dispatcher until Ctrl-C.
pub async fn run(bot: Bot, handler: Arc<ChatEventHandler>) {
    let schema = dptree::entry()
        .branch(Update::filter_message().endpoint(message_handler))
        .branch(Update::filter_callback_query().endpoint(callback_handler));

    tracing::info!("Starting Telegram dispatcher");
    Dispatcher::builder(bot, schema)
        .dependencies(dptree::deps![handler])
        .default_handler(|update| async move {
            tracing::debug!(update_id = update.id, "Unhandled update");
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "Error in update handler",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    tracing::info!("Telegram dispatcher stopped");
}

async fn message_handler(msg: Message, handler: Arc<ChatEventHandler>) -> ResponseResult<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let user_id = UserId::new(msg.chat.id.0);

    match classify_text(text) {
        TextEvent::Start => handler.on_start_command(user_id).await,
        TextEvent::FreeText(text) => handler.on_text(user_id, text).await,
        TextEvent::UnknownCommand => {
            tracing::debug!(user_id = %user_id, "Ignoring unknown command");
        }
    }
    Ok(())
}

async fn callback_handler(query: CallbackQuery, handler: Arc<ChatEventHandler>) -> ResponseResult<()> {
    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };
    // Telegram user ids fit in i64.
    let user_id = UserId::new(query.from.id.0 as i64);
    handler.on_callback(user_id, &query.id, data).await;
    Ok(())
}
