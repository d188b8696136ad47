use formrelay_telegram::config::{DEFAULT_API_BASE_URL, DEFAULT_MIN_UPLOAD_BYTES_PER_SEC};
use serde::Deserialize;

/// Outbound Telegram Bot API settings.
///
/// `timeout_seconds` bounds connection setup and each `sendMessage` call.
/// A `sendDocument` call gets that same budget plus the time its file takes
/// to stream at `min_upload_bytes_per_sec`, so a 50 MiB upload at the
/// default floor may run for about 14 minutes before it is abandoned.
///
/// # Example
///
/// ```toml
/// [telegram]
/// api_base_url = "https://api.telegram.org"
/// timeout_seconds = 30
/// min_upload_bytes_per_sec = 65536
/// ```
#[derive(Debug, Deserialize)]
pub struct TelegramServerConfig {
    /// Bot API base URL. Point this at a local Bot API server or a mock.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Connect timeout, and the base deadline of every call, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Slowest tolerated document upload throughput.
    #[serde(default = "default_min_upload_rate")]
    pub min_upload_bytes_per_sec: u64,
}

impl Default for TelegramServerConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            timeout_seconds: default_timeout(),
            min_upload_bytes_per_sec: default_min_upload_rate(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_owned()
}

fn default_timeout() -> u64 {
    30
}

fn default_min_upload_rate() -> u64 {
    DEFAULT_MIN_UPLOAD_BYTES_PER_SEC
}
