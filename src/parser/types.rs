use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::parser::columns::ColumnMap;

/// Raw uploaded table: header + string rows, kept as read so that raw
/// projections can echo the original cells.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: ColumnMap,
    rows: Vec<csv::StringRecord>,
}

impl Dataset {
    pub fn new(columns: ColumnMap, rows: Vec<csv::StringRecord>) -> Self {
        Dataset { columns, rows }
    }

    /// In-memory construction, mostly for tests and embedding callers.
    pub fn from_rows<S: AsRef<str>>(headers: &[&str], rows: &[Vec<S>]) -> Self {
        let columns = ColumnMap::from_names(headers.iter().copied());
        let rows = rows
            .iter()
            .map(|r| r.iter().map(|c| c.as_ref()).collect::<csv::StringRecord>())
            .collect();
        Dataset { columns, rows }
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn has(&self, col: &str) -> bool {
        self.columns.has(col)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Trimmed, non-empty cell value of a named column.
    pub fn value(&self, row: usize, col: &str) -> Option<&str> {
        self.columns
            .index(col)
            .and_then(|i| self.value_at(row, i))
    }

    pub fn value_at(&self, row: usize, index: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(index))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Canonical ticket, one per dataset row. Built once per run, never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketRecord {
    /// Index of the source row in the dataset.
    pub row: usize,
    pub ticket_id: Option<String>,
    /// Trimmed, lower-cased; empty when the cell is blank.
    pub status: String,
    pub created: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDate>,
    pub l1_due_date: Option<NaiveDate>,
    pub gitlab_due_date: Option<NaiveDate>,
    pub overdue: Option<bool>,
    pub classification: Option<String>,
    pub program: Option<String>,
    pub department: Option<String>,
    pub module_lead: Option<String>,
    pub engineer: Option<String>,
    pub solutions_engineer: Option<String>,
    pub group: Option<String>,
    pub product: Option<String>,
    pub priority: Option<String>,
    pub subject: Option<String>,
    pub gitlab_link: Option<String>,
    pub resolution: Option<String>,
    pub sub_category: Option<String>,
    pub reopen_count: Option<f64>,
}

impl TicketRecord {
    /// Reopen count with missing or unparsable values counted as zero.
    pub fn reopens(&self) -> f64 {
        self.reopen_count.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseWarning {
    pub line: usize,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_value_trims_and_drops_empty() {
        let ds = Dataset::from_rows(
            &["Ticket Id", "Subject"],
            &[vec![" 7 ", "   "], vec!["8", "Printer jam"]],
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.value(0, "Ticket Id"), Some("7"));
        assert_eq!(ds.value(0, "Subject"), None);
        assert_eq!(ds.value(1, "Subject"), Some("Printer jam"));
        assert_eq!(ds.value(1, "Missing"), None);
        assert_eq!(ds.value(5, "Subject"), None);
    }

    #[test]
    fn test_short_row_is_absent_not_panic() {
        let ds = Dataset::from_rows(&["A", "B", "C"], &[vec!["1"]]);
        assert_eq!(ds.value(0, "A"), Some("1"));
        assert_eq!(ds.value(0, "C"), None);
    }

    #[test]
    fn test_reopens_default_zero() {
        let t = TicketRecord::default();
        assert_eq!(t.reopens(), 0.0);
        let t = TicketRecord {
            reopen_count: Some(2.0),
            ..Default::default()
        };
        assert_eq!(t.reopens(), 2.0);
    }
}
