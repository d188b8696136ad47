//! Telegram Bot API client used by formrelay.
//!
//! Covers the two methods the relay needs:
//! [`sendMessage`](https://core.telegram.org/bots/api#sendmessage) for the
//! text notification and
//! [`sendDocument`](https://core.telegram.org/bots/api#senddocument) for
//! each uploaded file.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use formrelay_telegram::{ParseMode, TelegramClient, TelegramConfig};
//!
//! # async fn run() -> Result<(), formrelay_telegram::TelegramError> {
//! let config = TelegramConfig::new("123456:ABC-DEF", "-1001234567890");
//! let client = TelegramClient::new(config)?;
//! client.send_message("New submission", Some(ParseMode::Html)).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod trace_context;
pub mod types;

pub use client::{DocumentUpload, TelegramClient};
pub use config::TelegramConfig;
pub use error::TelegramError;
pub use trace_context::inject_trace_context;
pub use types::{ParseMode, SendMessageRequest, SentMessage, TelegramApiResponse};
