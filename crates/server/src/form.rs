//! Multipart decoding of an inbound form into a [`Submission`].
//!
//! Text parts are buffered in memory; file parts are streamed to temporary
//! files that live as long as the returned submission.

use axum::extract::multipart::{Field, Multipart, MultipartError, MultipartRejection};
use formrelay_core::{FileDescriptor, FormLimits, Submission};
use tempfile::TempPath;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

/// Errors produced while decoding a multipart body.
#[derive(Debug, Error)]
pub enum FormParseError {
    /// The request is not a usable multipart request (e.g. wrong content
    /// type or missing boundary).
    #[error("invalid multipart request: {0}")]
    Rejected(String),

    /// The body is malformed or could not be read.
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),

    /// An uploaded file could not be written to temporary storage.
    #[error("failed to spool upload: {0}")]
    Io(#[from] std::io::Error),

    /// A decoding limit was exceeded.
    #[error("{what} exceeds the limit of {limit}")]
    LimitExceeded {
        /// Which limit was hit.
        what: &'static str,
        /// The configured limit.
        limit: u64,
    },

    /// A named file part carried no bytes and empty files are not allowed.
    #[error("file in field `{0}` is empty")]
    EmptyFile(String),

    /// A text field was not valid UTF-8.
    #[error("field `{0}` is not valid UTF-8")]
    InvalidText(String),
}

impl From<MultipartRejection> for FormParseError {
    fn from(rejection: MultipartRejection) -> Self {
        Self::Rejected(rejection.body_text())
    }
}

/// Running totals checked against [`FormLimits`].
#[derive(Debug, Default)]
struct Usage {
    fields: usize,
    field_bytes: u64,
    file_bytes: u64,
}

/// Decode every part of `multipart` into a [`Submission`].
///
/// A part with a filename is a file, anything else is a text field. A file
/// part with an empty filename and no content is what browsers send for an
/// empty file input; it is skipped.
#[instrument(skip_all)]
pub async fn decode_submission(
    mut multipart: Multipart,
    limits: &FormLimits,
) -> Result<Submission, FormParseError> {
    let mut submission = Submission::new();
    let mut usage = Usage::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();

        let Some(filename) = field.file_name().map(str::to_owned) else {
            let value = read_text(field, &name, limits, &mut usage).await?;
            submission.push_field(name, value);
            continue;
        };

        let content_type = field.content_type().map(str::to_owned);
        let (temp_path, size) = spool_file(field, limits, &mut usage).await?;

        if size == 0 {
            if filename.is_empty() {
                debug!(field = %name, "skipping empty file input");
                continue;
            }
            if !limits.allow_empty_files {
                return Err(FormParseError::EmptyFile(name));
            }
        }

        debug!(field = %name, filename = %filename, size, "spooled uploaded file");
        submission.push_file(
            name,
            FileDescriptor::new(temp_path, filename, content_type, size),
        );
    }

    debug!(
        fields = submission.field_count(),
        files = submission.file_count(),
        "form decoded"
    );
    Ok(submission)
}

async fn read_text(
    mut field: Field<'_>,
    name: &str,
    limits: &FormLimits,
    usage: &mut Usage,
) -> Result<String, FormParseError> {
    usage.fields += 1;
    if usage.fields > limits.max_fields {
        return Err(FormParseError::LimitExceeded {
            what: "field count",
            limit: limits.max_fields as u64,
        });
    }

    let mut bytes = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        usage.field_bytes += chunk.len() as u64;
        if usage.field_bytes > limits.max_fields_size_bytes {
            return Err(FormParseError::LimitExceeded {
                what: "total field size",
                limit: limits.max_fields_size_bytes,
            });
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| FormParseError::InvalidText(name.to_owned()))
}

/// Stream one file part to a fresh temporary file.
///
/// On error the partially written file is removed when the `TempPath` drops.
async fn spool_file(
    mut field: Field<'_>,
    limits: &FormLimits,
    usage: &mut Usage,
) -> Result<(TempPath, u64), FormParseError> {
    let (file, temp_path) = tempfile::Builder::new()
        .prefix("formrelay-")
        .tempfile()?
        .into_parts();
    let mut file = tokio::fs::File::from_std(file);
    let mut size: u64 = 0;

    while let Some(chunk) = field.chunk().await? {
        size += chunk.len() as u64;
        usage.file_bytes += chunk.len() as u64;
        if size > limits.max_file_size_bytes {
            return Err(FormParseError::LimitExceeded {
                what: "file size",
                limit: limits.max_file_size_bytes,
            });
        }
        if usage.file_bytes > limits.max_total_file_size_bytes {
            return Err(FormParseError::LimitExceeded {
                what: "total file size",
                limit: limits.max_total_file_size_bytes,
            });
        }
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok((temp_path, size))
}
