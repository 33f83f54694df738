//! Telegram Adapters (teloxide).
//!
//! - `TelegramTransport` - outgoing messages, photos and callback answers
//! - `run` - long-polling dispatcher feeding the `ChatEventHandler`

mod dispatcher;
mod transport;

pub use dispatcher::{classify_text, run, TextEvent};
pub use transport::TelegramTransport;
