//! Delivery of a decoded submission to the operator's chat.
//!
//! The text notification always goes first. If it fails nothing else is
//! sent; otherwise every file field is uploaded in decoder order and each
//! failure is recorded without stopping the loop.

use std::future::Future;

use formrelay_core::{FileDescriptor, RelayReport, Submission, format_notification};
use formrelay_telegram::{DocumentUpload, ParseMode, TelegramClient, TelegramError};
use tracing::{debug, error, info, instrument};

use crate::error::SubmitError;

/// Outbound messaging used by the relay pipeline.
///
/// Uses native `async fn` in traits; [`TelegramClient`] is the production
/// implementation.
pub trait Messenger: Send + Sync {
    /// Send the formatted notification text.
    fn notify_text(&self, text: &str) -> impl Future<Output = Result<(), TelegramError>> + Send;

    /// Upload one file that arrived under form field `field`.
    fn upload_document(
        &self,
        field: &str,
        file: &FileDescriptor,
    ) -> impl Future<Output = Result<(), TelegramError>> + Send;
}

impl Messenger for TelegramClient {
    async fn notify_text(&self, text: &str) -> Result<(), TelegramError> {
        self.send_message(text, Some(ParseMode::Html))
            .await
            .map(|_| ())
    }

    async fn upload_document(
        &self,
        field: &str,
        file: &FileDescriptor,
    ) -> Result<(), TelegramError> {
        self.send_document(DocumentUpload {
            path: file.temp_path(),
            filename: &file.original_filename,
            content_type: file.content_type.as_deref(),
            caption: Some(document_caption(field, file)),
        })
        .await
        .map(|_| ())
    }
}

/// Caption attached to an uploaded document.
pub fn document_caption(field: &str, file: &FileDescriptor) -> String {
    format!("{field}: {}", file.original_filename)
}

/// Send the notification, then relay the files if it succeeded.
#[instrument(skip_all, fields(files = submission.file_count()))]
pub async fn relay_submission<M: Messenger>(
    messenger: &M,
    submission: &Submission,
) -> Result<RelayReport, SubmitError> {
    let text = format_notification(submission);

    if let Err(e) = messenger.notify_text(&text).await {
        error!(upstream = %e.upstream_detail(), "failed to send text message to Telegram");
        return Err(SubmitError::Notification(e));
    }
    info!("text notification sent");

    let report = relay_documents(messenger, submission).await;
    if !report.all_succeeded() {
        info!(
            attempted = report.attempted,
            failed = ?report.failed_fields,
            "some document uploads failed"
        );
    }
    Ok(report)
}

/// Upload the first file of every file field, collecting failures.
///
/// Additional files under the same field name are not sent.
pub async fn relay_documents<M: Messenger>(messenger: &M, submission: &Submission) -> RelayReport {
    let mut report = RelayReport::default();

    for (field, files) in submission.files() {
        let Some(file) = files.first() else {
            continue;
        };
        if files.len() > 1 {
            debug!(
                field,
                ignored = files.len() - 1,
                "only the first file per field is relayed"
            );
        }

        let result = messenger.upload_document(field, file).await;
        match &result {
            Ok(()) => debug!(field, filename = %file.original_filename, "document uploaded"),
            Err(e) => error!(
                field,
                filename = %file.original_filename,
                upstream = %e.upstream_detail(),
                "failed to upload document to Telegram"
            ),
        }
        report = report.record(field, &result);
    }

    report
}
