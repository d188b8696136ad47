//! Core types for the formrelay form-to-Telegram bridge.
//!
//! A [`Submission`] is what the server decodes from one multipart request.
//! [`format_notification`] turns its text fields into the message sent to
//! the operator's chat, and [`Credentials`] carries the two secrets read
//! through a [`SecretSource`] on every request.

pub mod error;
pub mod limits;
pub mod outcome;
pub mod schema;
pub mod secrets;
pub mod submission;

pub use error::ConfigurationError;
pub use limits::FormLimits;
pub use outcome::RelayReport;
pub use schema::{FORM_FIELDS, FormField, MISSING_VALUE, escape_html, format_notification};
pub use secrets::{
    BOT_TOKEN_VAR, CHAT_ID_VAR, Credentials, ProcessEnv, SecretSource, StaticSecrets,
};
pub use submission::{FileDescriptor, Submission};
