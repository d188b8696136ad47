use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Default Telegram Bot API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Default upload floor, 64 KiB/s.
pub const DEFAULT_MIN_UPLOAD_BYTES_PER_SEC: u64 = 64 * 1024;

/// Configuration for the Telegram client.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Bot token issued by `@BotFather`.
    pub token: SecretString,

    /// Chat every message and document is sent to.
    pub chat_id: String,

    /// Base URL for the Bot API. Override this for testing against a mock
    /// server.
    pub api_base_url: String,

    /// Deadline for a `sendMessage` call, and the fixed part of every
    /// `sendDocument` deadline.
    pub timeout: Duration,

    /// Slowest upload throughput tolerated before a `sendDocument` call is
    /// abandoned. See [`TelegramConfig::upload_timeout`].
    pub min_upload_bytes_per_sec: u64,
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .field("min_upload_bytes_per_sec", &self.min_upload_bytes_per_sec)
            .finish()
    }
}

impl TelegramConfig {
    /// Create a new configuration for the given bot token and chat.
    ///
    /// Uses the public Bot API base URL, a 30 second timeout and a 64 KiB/s
    /// upload floor.
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            token: SecretString::new(token.into()),
            chat_id: chat_id.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
            min_upload_bytes_per_sec: DEFAULT_MIN_UPLOAD_BYTES_PER_SEC,
        }
    }

    /// Override the API base URL (useful for testing).
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the upload throughput floor.
    #[must_use]
    pub fn with_min_upload_rate(mut self, bytes_per_sec: u64) -> Self {
        self.min_upload_bytes_per_sec = bytes_per_sec;
        self
    }

    /// Deadline for uploading a document of `len` bytes: the base timeout
    /// plus the time the body takes at the throughput floor.
    pub fn upload_timeout(&self, len: u64) -> Duration {
        let streaming = Duration::from_secs(len / self.min_upload_bytes_per_sec.max(1));
        self.timeout.saturating_add(streaming)
    }

    /// Full URL for a Bot API method. Contains the token.
    pub(crate) fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{method}",
            self.api_base_url,
            self.token.expose_secret()
        )
    }
}
