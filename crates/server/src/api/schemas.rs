use axum::http::StatusCode;
use formrelay_core::RelayReport;
use serde::{Deserialize, Serialize};

/// Outcome class reported to the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitStatus {
    /// The notification and every file were delivered.
    Success,
    /// The notification was delivered but some files were not.
    PartialSuccess,
    /// Nothing useful was delivered.
    Error,
}

/// JSON body returned by the submit endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Outcome class.
    pub status: SubmitStatus,
    /// Human-readable summary.
    pub message: String,
}

impl SubmitResponse {
    /// An error body with a fixed message.
    pub fn error(message: &str) -> Self {
        Self {
            status: SubmitStatus::Error,
            message: message.to_owned(),
        }
    }

    /// The body for a fully delivered submission.
    pub fn success() -> Self {
        Self {
            status: SubmitStatus::Success,
            message: "Form data and all files sent to Telegram successfully.".to_owned(),
        }
    }

    /// The body for a submission whose files partly failed.
    pub fn partial(failed_fields: &[String]) -> Self {
        Self {
            status: SubmitStatus::PartialSuccess,
            message: format!(
                "Form data sent, but failed to upload files: {}",
                failed_fields.join(", ")
            ),
        }
    }

    /// Map a relay report to its status code and body.
    pub fn from_report(report: &RelayReport) -> (StatusCode, Self) {
        if report.all_succeeded() {
            (StatusCode::OK, Self::success())
        } else {
            (
                StatusCode::MULTI_STATUS,
                Self::partial(&report.failed_fields),
            )
        }
    }
}

/// Liveness response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Crate version of the running server.
    pub version: String,
}
