use thiserror::Error;

use crate::report::table::ReportTable;

/// Recoverable report outcome rendered as a one-row notice instead of
/// failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportIssue {
    /// A column the report cannot do without is absent.
    #[error("{0}")]
    MissingColumn(String),

    /// Filtering left nothing to report.
    #[error("{0}")]
    EmptyResult(String),
}

impl ReportIssue {
    /// "<column> column not found"
    pub fn missing_column(column: &str) -> Self {
        ReportIssue::MissingColumn(format!("{} column not found", column))
    }

    pub fn empty(message: impl Into<String>) -> Self {
        ReportIssue::EmptyResult(message.into())
    }

    pub fn into_table(self) -> ReportTable {
        ReportTable::notice_only(self.to_string())
    }
}
