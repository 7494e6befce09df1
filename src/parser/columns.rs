use std::collections::HashMap;

// ── Column vocabulary of the ticket export ────────────────────────────────────

pub const TICKET_ID: &str = "Ticket Id";
pub const STATUS: &str = "Status (Ticket)";
pub const DUE_DATE: &str = "Due Date";
pub const L1_DUE_DATE: &str = "L1-Due Date";
pub const GITLAB_DUE_DATE: &str = "Gitlab Due date";
pub const GITLAB_LINK: &str = "Gitlab Link";
pub const IS_OVERDUE: &str = "Is Overdue";
pub const CLASSIFICATIONS: &str = "Classifications";
pub const PROGRAM: &str = "Program Name";
pub const DEPARTMENT: &str = "Department Name";
pub const MODULE_LEAD: &str = "Module Lead";
pub const ENGINEER: &str = "Select Engineer";
pub const SOLUTIONS_ENGINEER: &str = "Solutions Engineer";
pub const TICKET_GROUP: &str = "Ticket Group";
pub const PRODUCT: &str = "Product OR PS Ticket";
pub const PRIORITY: &str = "Priority (Ticket)";
pub const SUBJECT: &str = "Subject";
pub const REOPEN_COUNT: &str = "Number of Reopen";

/// Creation time; some exports carry the truncated header.
pub const CREATED_TIME: &[&str] = &["Created Time (Ticket)", "Created Tim"];

/// Free-text columns describing the fix, by decreasing preference.
pub const RESOLUTION_CANDIDATES: &[&str] = &[
    "Resolution",
    "Solution",
    "Fix",
    "Root Cause",
    "Closure Comments",
    "Subject",
];

/// Sub-category columns, by decreasing preference.
pub const SUB_CATEGORY_CANDIDATES: &[&str] = &[
    "Ticket Sub Category",
    "Request Sub Category",
    "Category Of Issue",
    "Category Type",
    "Subject",
];

/// Maps column names to their index in a CSV record.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: HashMap<String, usize>,
    headers: Vec<String>,
}

impl ColumnMap {
    /// Build a ColumnMap from the CSV header record.
    /// Header fields are trimmed of surrounding whitespace; on duplicate
    /// names the first occurrence wins.
    pub fn from_headers(headers: &csv::StringRecord) -> Self {
        Self::from_names(headers.iter())
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut indices = HashMap::new();
        let mut header_list = Vec::new();
        for (i, field) in names.into_iter().enumerate() {
            let name = field.trim().to_string();
            indices.entry(name.clone()).or_insert(i);
            header_list.push(name);
        }
        ColumnMap {
            indices,
            headers: header_list,
        }
    }

    /// Returns true if the column is present in the CSV headers.
    pub fn has(&self, col: &str) -> bool {
        self.indices.contains_key(col)
    }

    pub fn index(&self, col: &str) -> Option<usize> {
        self.indices.get(col).copied()
    }

    /// First candidate present in the headers, with its index.
    pub fn first_present(&self, candidates: &[&'static str]) -> Option<(&'static str, usize)> {
        candidates
            .iter()
            .find_map(|&c| self.index(c).map(|i| (c, i)))
    }

    /// All header names in order.
    pub fn all_headers(&self) -> &[String] {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_headers(cols: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(cols.to_vec())
    }

    #[test]
    fn test_column_map_basic() {
        let headers = make_headers(&["Ticket Id", "Subject", "Status (Ticket)"]);
        let cm = ColumnMap::from_headers(&headers);
        assert!(cm.has(TICKET_ID));
        assert!(cm.has(SUBJECT));
        assert!(!cm.has("Missing"));
    }

    #[test]
    fn test_column_map_index() {
        let headers = make_headers(&["Ticket Id", "Subject"]);
        let cm = ColumnMap::from_headers(&headers);
        assert_eq!(cm.index(TICKET_ID), Some(0));
        assert_eq!(cm.index(SUBJECT), Some(1));
        assert_eq!(cm.index("Missing"), None);
    }

    #[test]
    fn test_column_map_trim_whitespace() {
        let headers = make_headers(&[" Ticket Id ", " Subject "]);
        let cm = ColumnMap::from_headers(&headers);
        assert!(cm.has(TICKET_ID));
        assert!(cm.has(SUBJECT));
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let cm = ColumnMap::from_names(["Subject", "Ticket Id", "Subject"]);
        assert_eq!(cm.index(SUBJECT), Some(0));
        assert_eq!(cm.all_headers().len(), 3);
    }

    #[test]
    fn test_first_present_respects_priority() {
        let cm = ColumnMap::from_names(["Subject", "Root Cause", "Fix"]);
        assert_eq!(cm.first_present(RESOLUTION_CANDIDATES), Some(("Fix", 2)));

        let cm = ColumnMap::from_names(["Subject"]);
        assert_eq!(cm.first_present(RESOLUTION_CANDIDATES), Some(("Subject", 0)));

        let cm = ColumnMap::from_names(["Ticket Id"]);
        assert_eq!(cm.first_present(RESOLUTION_CANDIDATES), None);
    }
}
