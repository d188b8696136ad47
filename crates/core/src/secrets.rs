//! Access to the two secrets every submission needs.
//!
//! Secrets are looked up on every request through a [`SecretSource`], so a
//! deployment that fixes a missing variable starts working without a
//! restart, and tests can supply values without touching the process
//! environment.

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigurationError;

/// Environment variable holding the Telegram bot token.
pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";

/// Environment variable holding the destination chat identifier.
pub const CHAT_ID_VAR: &str = "CHAT_ID";

/// A read-only lookup of named secret values.
pub trait SecretSource: Send + Sync {
    /// Return the value for `key`, or `None` if it is not set.
    fn get(&self, key: &str) -> Option<String>;
}

/// Reads secrets from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl SecretSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed in-memory secret map.
#[derive(Clone, Default)]
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl std::fmt::Debug for StaticSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("StaticSecrets").field("keys", &keys).finish()
    }
}

impl StaticSecrets {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl SecretSource for StaticSecrets {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// The bot credential and destination chat for one request.
#[derive(Clone)]
pub struct Credentials {
    /// Telegram bot token.
    pub bot_token: SecretString,
    /// Destination chat identifier.
    pub chat_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("bot_token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

impl Credentials {
    /// Read both secrets from `source`.
    ///
    /// A value that is unset or blank counts as missing. Every missing key
    /// is named in the error.
    pub fn load(source: &dyn SecretSource) -> Result<Self, ConfigurationError> {
        match (
            non_empty(source, BOT_TOKEN_VAR),
            non_empty(source, CHAT_ID_VAR),
        ) {
            (Some(bot_token), Some(chat_id)) => Ok(Self {
                bot_token: SecretString::new(bot_token),
                chat_id,
            }),
            (bot_token, chat_id) => {
                let missing = [(BOT_TOKEN_VAR, bot_token), (CHAT_ID_VAR, chat_id)]
                    .into_iter()
                    .filter(|(_, value)| value.is_none())
                    .map(|(key, _)| key)
                    .collect();
                Err(ConfigurationError::MissingSecrets(missing))
            }
        }
    }

    /// Borrow the raw token for building API URLs.
    pub fn token(&self) -> &str {
        self.bot_token.expose_secret()
    }
}

fn non_empty(source: &dyn SecretSource, key: &str) -> Option<String> {
    source.get(key).filter(|v| !v.trim().is_empty())
}
