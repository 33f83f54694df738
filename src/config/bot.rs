//! Chat transport credential

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// Bot API token issued by @BotFather
    pub token: Secret<String>,
}

impl BotConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("BOT__TOKEN"));
        }
        Ok(())
    }
}
