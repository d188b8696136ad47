mod cors;
mod server;
mod telegram;
mod telemetry;

#[cfg(test)]
mod tests;

pub use cors::*;
pub use server::*;
pub use telegram::*;
pub use telemetry::*;

use std::path::Path;

use formrelay_core::FormLimits;
use serde::Deserialize;

use crate::error::ServerError;

/// Top-level configuration for the formrelay server, loaded from a TOML file.
///
/// Secrets (`BOT_TOKEN`, `CHAT_ID`) are deliberately absent: they are read
/// from the environment on every request.
#[derive(Debug, Default, Deserialize)]
pub struct FormRelayConfig {
    /// HTTP server bind configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Outbound Telegram API settings.
    #[serde(default)]
    pub telegram: TelegramServerConfig,
    /// Multipart decoding limits.
    #[serde(default)]
    pub limits: FormLimits,
    /// Cross-origin settings for browser form posts.
    #[serde(default)]
    pub cors: CorsConfig,
    /// OpenTelemetry distributed tracing configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl FormRelayConfig {
    /// Load the configuration at `path`, or the defaults if the file does
    /// not exist.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| ServerError::Config(format!("failed to parse {}: {e}", path.display())))
    }
}
