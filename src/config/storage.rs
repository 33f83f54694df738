//! Session and dialogue storage configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Where sessions and dialogues are kept
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on restart
    #[default]
    Memory,
    Redis,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Redis connection URL, required for the Redis backend
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Expiry of an idle dialogue in seconds (Redis only)
    #[serde(default = "default_dialogue_ttl")]
    pub dialogue_ttl_secs: u64,
}

impl StorageConfig {
    pub fn dialogue_ttl(&self) -> Duration {
        Duration::from_secs(self.dialogue_ttl_secs)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::Redis {
            let url = self
                .redis_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .ok_or(ValidationError::MissingRequired("STORAGE__REDIS_URL"))?;
            if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                return Err(ValidationError::InvalidRedisUrl);
            }
        }
        if self.dialogue_ttl_secs == 0 {
            return Err(ValidationError::InvalidDialogueTtl);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            redis_url: None,
            dialogue_ttl_secs: default_dialogue_ttl(),
        }
    }
}

fn default_dialogue_ttl() -> u64 {
    3600
}
