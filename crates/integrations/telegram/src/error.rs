use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the Telegram client.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// An HTTP-level transport error occurred (connect, timeout, body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The Bot API rejected the request.
    #[error("Telegram API error (HTTP {status}): {description}")]
    Api {
        /// HTTP status of the response.
        status: StatusCode,
        /// Telegram's `description`, or the raw body when it was not JSON.
        description: String,
        /// Raw response body.
        payload: String,
    },

    /// The Bot API returned HTTP 429.
    #[error("rate limited by Telegram")]
    RateLimited {
        /// Seconds to wait, when Telegram supplied it.
        retry_after: Option<u64>,
        /// Raw response body.
        payload: String,
    },

    /// A local file could not be read for upload.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The response could not be interpreted.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

impl TelegramError {
    /// The upstream response body when Telegram sent one, otherwise the
    /// error description.
    pub fn upstream_detail(&self) -> String {
        match self {
            Self::Api { payload, .. } | Self::RateLimited { payload, .. }
                if !payload.is_empty() =>
            {
                payload.clone()
            }
            other => other.to_string(),
        }
    }
}
