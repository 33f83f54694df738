//! Symbio Bot binary: wires configuration, storage, the remote API client
//! and the Telegram dispatcher together.

use secrecy::ExposeSecret;
use std::sync::Arc;
use teloxide::Bot;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use symbio_bot::adapters::remote::{HttpGatewayConfig, HttpRemoteGateway};
use symbio_bot::adapters::storage::{
    InMemoryDialogueStore, InMemorySessionStore, RedisDialogueStore, RedisSessionStore,
};
use symbio_bot::adapters::telegram::{self, TelegramTransport};
use symbio_bot::application::{ChatEventHandler, DialogueController};
use symbio_bot::config::{AppConfig, StorageBackend, StorageConfig};
use symbio_bot::ports::{DialogueStore, SessionStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration
    let config = AppConfig::load()?;
    config.validate()?;

    // Initialize logging
    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(config.logging.env_filter())
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    // Storage
    let (sessions, dialogues) = build_stores(&config.storage).await?;
    tracing::info!(backend = ?config.storage.backend, "Storage ready");

    // Remote API
    let gateway = HttpRemoteGateway::new(
        HttpGatewayConfig::new(config.api.base_url()).with_timeout(config.api.timeout()),
    )?;
    tracing::info!(base_url = %config.api.base_url(), "Remote API client ready");

    // Chat transport
    let bot = Bot::new(config.bot.token.expose_secret());
    let controller = Arc::new(DialogueController::new(sessions, dialogues, Arc::new(gateway)));
    let handler = Arc::new(ChatEventHandler::new(
        controller,
        Arc::new(TelegramTransport::new(bot.clone())),
    ));

    telegram::run(bot, handler).await;
    Ok(())
}

async fn build_stores(
    config: &StorageConfig,
) -> Result<(Arc<dyn SessionStore>, Arc<dyn DialogueStore>), redis::RedisError> {
    match config.backend {
        StorageBackend::Memory => {
            let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
            let dialogues: Arc<dyn DialogueStore> = Arc::new(InMemoryDialogueStore::new());
            Ok((sessions, dialogues))
        }
        StorageBackend::Redis => {
            let client = redis::Client::open(config.redis_url.as_deref().unwrap_or_default())?;
            let conn = client.get_multiplexed_async_connection().await?;
            let sessions: Arc<dyn SessionStore> = Arc::new(RedisSessionStore::new(conn.clone()));
            let dialogues: Arc<dyn DialogueStore> =
                Arc::new(RedisDialogueStore::new(conn).with_ttl(config.dialogue_ttl()));
            Ok((sessions, dialogues))
        }
    }
}
