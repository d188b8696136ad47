use thiserror::Error;

/// The server is missing configuration it needs to handle a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// One or more required secrets are unset or blank, in lookup order.
    #[error("required secrets not set: {}", .0.join(", "))]
    MissingSecrets(Vec<&'static str>),
}
