use serde::Deserialize;

const MIB: u64 = 1024 * 1024;

/// Size and count limits applied while decoding a multipart submission.
///
/// # Example
///
/// ```toml
/// [limits]
/// max_fields = 1000
/// max_fields_size_bytes = 20971520
/// max_file_size_bytes = 209715200
/// max_total_file_size_bytes = 209715200
/// allow_empty_files = false
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FormLimits {
    /// Maximum number of text fields.
    pub max_fields: usize,
    /// Maximum combined size of all text field values.
    pub max_fields_size_bytes: u64,
    /// Maximum size of a single uploaded file.
    pub max_file_size_bytes: u64,
    /// Maximum combined size of all uploaded files.
    pub max_total_file_size_bytes: u64,
    /// Whether a named file part with zero bytes is accepted.
    pub allow_empty_files: bool,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self {
            max_fields: 1000,
            max_fields_size_bytes: 20 * MIB,
            max_file_size_bytes: 200 * MIB,
            max_total_file_size_bytes: 200 * MIB,
            allow_empty_files: false,
        }
    }
}

impl FormLimits {
    /// Upper bound for the raw request body so the framework never rejects
    /// a body the decoder would accept.
    pub fn max_body_bytes(&self) -> usize {
        let total = self
            .max_total_file_size_bytes
            .saturating_add(self.max_fields_size_bytes)
            .saturating_add(MIB);
        usize::try_from(total).unwrap_or(usize::MAX)
    }
}
