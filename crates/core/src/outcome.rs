/// Result of relaying a submission's files.
///
/// Only failures are tracked; the report is built by folding each upload
/// attempt into it with [`RelayReport::record`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayReport {
    /// Number of upload attempts made.
    pub attempted: usize,
    /// Field names whose upload failed, in attempt order.
    pub failed_fields: Vec<String>,
}

impl RelayReport {
    /// Fold one upload attempt into the report.
    #[must_use]
    pub fn record<E>(mut self, field: &str, result: &Result<(), E>) -> Self {
        self.attempted += 1;
        if result.is_err() {
            self.failed_fields.push(field.to_owned());
        }
        self
    }

    /// Whether every attempted upload succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed_fields.is_empty()
    }
}
