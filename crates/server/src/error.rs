use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use formrelay_core::ConfigurationError;
use formrelay_telegram::TelegramError;
use thiserror::Error;

use crate::api::schemas::SubmitResponse;
use crate::form::FormParseError;

/// Errors that can occur while starting or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An I/O error (e.g. reading the config file or binding the listener).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A submission that ended in an outright failure.
///
/// Each variant maps to one fixed response body. The wrapped detail is for
/// the log only and never reaches the caller.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request was not a `POST`.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Required secrets are missing.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The multipart body could not be decoded.
    #[error("form parse error: {0}")]
    FormParse(#[from] FormParseError),

    /// The text notification could not be delivered.
    #[error("notification failed: {0}")]
    Notification(#[source] TelegramError),
}

impl SubmitError {
    /// HTTP status returned for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Configuration(_) | Self::FormParse(_) | Self::Notification(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message returned to the caller.
    pub fn public_message(&self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "Invalid request method.",
            Self::Configuration(_) => "Server configuration error.",
            Self::FormParse(_) => "Error processing form data.",
            Self::Notification(_) => "Failed to send text message to Telegram.",
        }
    }
}

impl IntoResponse for SubmitError {
    fn into_response(self) -> Response {
        let body = SubmitResponse::error(self.public_message());
        (self.status_code(), axum::Json(body)).into_response()
    }
}
