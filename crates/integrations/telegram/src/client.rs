use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio_util::io::ReaderStream;
use tracing::{debug, instrument, warn};

use crate::config::TelegramConfig;
use crate::error::TelegramError;
use crate::trace_context::inject_trace_context;
use crate::types::{ParseMode, SendMessageRequest, SentMessage, TelegramApiResponse};

/// A file on local disk to send with `sendDocument`.
#[derive(Debug, Clone)]
pub struct DocumentUpload<'a> {
    /// Where the file content is read from.
    pub path: &'a Path,
    /// Name shown in the chat.
    pub filename: &'a str,
    /// MIME type for the part. Ignored when it does not parse.
    pub content_type: Option<&'a str>,
    /// Optional caption, 0-1024 characters.
    pub caption: Option<String>,
}

/// Client for the Telegram Bot API bound to one bot and one chat.
pub struct TelegramClient {
    config: TelegramConfig,
    client: Client,
}

impl TelegramClient {
    /// Create a client with its own connection pool. `config.timeout` also
    /// bounds connection setup.
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(http)?;
        Ok(Self { config, client })
    }

    /// Create a client that shares an existing `reqwest::Client`.
    ///
    /// Each call still sets its own deadline from `config`, which takes
    /// precedence over any overall timeout on the shared client.
    pub fn with_client(config: TelegramConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Send a text message to the configured chat.
    #[instrument(skip(self, text), fields(chat_id = %self.config.chat_id, method = "sendMessage"))]
    pub async fn send_message(
        &self,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<SentMessage, TelegramError> {
        let request = SendMessageRequest {
            chat_id: self.config.chat_id.clone(),
            text: text.to_owned(),
            parse_mode,
        };

        debug!(text_len = text.len(), "sending message to Telegram");

        let response = inject_trace_context(
            self.client
                .post(self.config.method_url("sendMessage"))
                .timeout(self.config.timeout)
                .json(&request),
        )
        .send()
        .await
        .map_err(http)?;

        interpret_response(response).await
    }

    /// Upload a local file as a document to the configured chat.
    ///
    /// The file is streamed from disk. Its handle is owned by the request
    /// body and closed when the call returns, whatever the outcome.
    #[instrument(
        skip(self, upload),
        fields(chat_id = %self.config.chat_id, method = "sendDocument", filename = %upload.filename)
    )]
    pub async fn send_document(
        &self,
        upload: DocumentUpload<'_>,
    ) -> Result<SentMessage, TelegramError> {
        let file = tokio::fs::File::open(upload.path).await?;
        let len = file.metadata().await?.len();

        let mut part = Part::stream_with_length(
            reqwest::Body::wrap_stream(ReaderStream::new(file)),
            len,
        )
        .file_name(upload.filename.to_owned());
        if let Some(content_type) = upload.content_type.filter(|ct| is_valid_mime(ct)) {
            part = part.mime_str(content_type).map_err(http)?;
        }

        let mut form = Form::new()
            .text("chat_id", self.config.chat_id.clone())
            .part("document", part);
        if let Some(caption) = upload.caption {
            form = form.text("caption", caption);
        }

        let deadline = self.config.upload_timeout(len);
        debug!(size = len, ?deadline, "uploading document to Telegram");

        let response = inject_trace_context(
            self.client
                .post(self.config.method_url("sendDocument"))
                .timeout(deadline)
                .multipart(form),
        )
        .send()
        .await
        .map_err(http)?;

        interpret_response(response).await
    }
}

/// Strip the request URL from transport errors; it contains the bot token.
fn http(err: reqwest::Error) -> TelegramError {
    TelegramError::Http(err.without_url())
}

fn is_valid_mime(content_type: &str) -> bool {
    Part::bytes(Vec::new()).mime_str(content_type).is_ok()
}

/// Map a Bot API response onto its `result`, or the matching error.
async fn interpret_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TelegramError> {
    let status = response.status();
    let payload = response.text().await.map_err(http)?;

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = serde_json::from_str::<TelegramApiResponse<serde_json::Value>>(&payload)
            .ok()
            .and_then(|r| r.parameters)
            .and_then(|p| p.retry_after);
        warn!(?retry_after, "Telegram API rate limit hit");
        return Err(TelegramError::RateLimited {
            retry_after,
            payload,
        });
    }

    let parsed = serde_json::from_str::<TelegramApiResponse<T>>(&payload);

    if !status.is_success() {
        let description = parsed
            .ok()
            .and_then(|r| r.description)
            .unwrap_or_else(|| payload.clone());
        return Err(TelegramError::Api {
            status,
            description,
            payload,
        });
    }

    let envelope = parsed
        .map_err(|e| TelegramError::InvalidPayload(format!("failed to parse response: {e}")))?;

    if !envelope.ok {
        return Err(TelegramError::Api {
            status,
            description: envelope
                .description
                .unwrap_or_else(|| "unknown error".to_owned()),
            payload,
        });
    }

    envelope
        .result
        .ok_or_else(|| TelegramError::InvalidPayload("response is missing `result`".into()))
}
