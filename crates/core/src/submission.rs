use std::path::Path;

use tempfile::TempPath;

/// A file uploaded as part of a form submission.
///
/// The bytes live in a temporary file owned by this descriptor. Dropping the
/// descriptor deletes the file, so the path is only valid for as long as the
/// owning [`Submission`] is alive.
#[derive(Debug)]
pub struct FileDescriptor {
    temp_path: TempPath,
    /// Filename supplied by the client. Untrusted; only used for display and
    /// as the outgoing attachment name.
    pub original_filename: String,
    /// Content type supplied by the client. Advisory only.
    pub content_type: Option<String>,
    /// Number of bytes spooled to the temporary file.
    pub size: u64,
}

impl FileDescriptor {
    /// Wrap an already-written temporary file.
    pub fn new(
        temp_path: TempPath,
        original_filename: impl Into<String>,
        content_type: Option<String>,
        size: u64,
    ) -> Self {
        Self {
            temp_path,
            original_filename: original_filename.into(),
            content_type,
            size,
        }
    }

    /// Location of the spooled file content.
    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }
}

/// The decoded contents of one inbound form request.
///
/// Both maps preserve the order in which the decoder first encountered each
/// field name. Values for a repeated name are kept in submission order.
#[derive(Debug, Default)]
pub struct Submission {
    fields: Vec<(String, Vec<String>)>,
    files: Vec<(String, Vec<FileDescriptor>)>,
}

impl Submission {
    /// Create an empty submission.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text value for `name`.
    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        push_ordered(&mut self.fields, name.into(), value.into());
    }

    /// Append a file for `name`.
    pub fn push_file(&mut self, name: impl Into<String>, file: FileDescriptor) {
        push_ordered(&mut self.files, name.into(), file);
    }

    /// All text values submitted under `name`. Empty when the field is absent.
    pub fn field_values(&self, name: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default()
    }

    /// The first text value submitted under `name`, if any.
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.field_values(name).first().map(String::as_str)
    }

    /// All files submitted under `name`. Empty when the field is absent.
    pub fn files_for(&self, name: &str) -> &[FileDescriptor] {
        self.files
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, files)| files.as_slice())
            .unwrap_or_default()
    }

    /// File fields in first-seen order.
    pub fn files(&self) -> impl Iterator<Item = (&str, &[FileDescriptor])> {
        self.files.iter().map(|(n, f)| (n.as_str(), f.as_slice()))
    }

    /// Number of distinct text field names.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Total number of files across all file fields.
    pub fn file_count(&self) -> usize {
        self.files.iter().map(|(_, f)| f.len()).sum()
    }
}

fn push_ordered<T>(entries: &mut Vec<(String, Vec<T>)>, name: String, value: T) {
    if let Some((_, values)) = entries.iter_mut().find(|(n, _)| *n == name) {
        values.push(value);
    } else {
        entries.push((name, vec![value]));
    }
}
