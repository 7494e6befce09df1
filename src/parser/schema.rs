//! Schema negotiation: each logical ticket field is resolved once per run
//! against the header, then every row is read through the resolved indices.

use crate::parser::columns::{self, ColumnMap};
use crate::parser::deserializers::{parse_count, parse_date, parse_datetime, parse_flag};
use crate::parser::types::{Dataset, TicketRecord};

/// A logical field bound to a concrete column of the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalColumn {
    pub name: &'static str,
    pub index: usize,
}

/// Result of negotiating the ticket model against the uploaded header.
/// An absent field means no candidate column exists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketSchema {
    pub ticket_id: Option<LogicalColumn>,
    pub status: Option<LogicalColumn>,
    pub created: Option<LogicalColumn>,
    pub due_date: Option<LogicalColumn>,
    pub l1_due_date: Option<LogicalColumn>,
    pub gitlab_due_date: Option<LogicalColumn>,
    pub overdue: Option<LogicalColumn>,
    pub classification: Option<LogicalColumn>,
    pub program: Option<LogicalColumn>,
    pub department: Option<LogicalColumn>,
    pub module_lead: Option<LogicalColumn>,
    pub engineer: Option<LogicalColumn>,
    pub solutions_engineer: Option<LogicalColumn>,
    pub group: Option<LogicalColumn>,
    pub product: Option<LogicalColumn>,
    pub priority: Option<LogicalColumn>,
    pub subject: Option<LogicalColumn>,
    pub gitlab_link: Option<LogicalColumn>,
    pub resolution: Option<LogicalColumn>,
    pub sub_category: Option<LogicalColumn>,
    pub reopen_count: Option<LogicalColumn>,
}

fn one(cm: &ColumnMap, name: &'static str) -> Option<LogicalColumn> {
    cm.index(name).map(|index| LogicalColumn { name, index })
}

fn first(cm: &ColumnMap, candidates: &[&'static str]) -> Option<LogicalColumn> {
    cm.first_present(candidates)
        .map(|(name, index)| LogicalColumn { name, index })
}

impl TicketSchema {
    pub fn negotiate(cm: &ColumnMap) -> Self {
        TicketSchema {
            ticket_id: one(cm, columns::TICKET_ID),
            status: one(cm, columns::STATUS),
            created: first(cm, columns::CREATED_TIME),
            due_date: one(cm, columns::DUE_DATE),
            l1_due_date: one(cm, columns::L1_DUE_DATE),
            gitlab_due_date: one(cm, columns::GITLAB_DUE_DATE),
            overdue: one(cm, columns::IS_OVERDUE),
            classification: one(cm, columns::CLASSIFICATIONS),
            program: one(cm, columns::PROGRAM),
            department: one(cm, columns::DEPARTMENT),
            module_lead: one(cm, columns::MODULE_LEAD),
            engineer: one(cm, columns::ENGINEER),
            solutions_engineer: one(cm, columns::SOLUTIONS_ENGINEER),
            group: one(cm, columns::TICKET_GROUP),
            product: one(cm, columns::PRODUCT),
            priority: one(cm, columns::PRIORITY),
            subject: one(cm, columns::SUBJECT),
            gitlab_link: one(cm, columns::GITLAB_LINK),
            resolution: first(cm, columns::RESOLUTION_CANDIDATES),
            sub_category: first(cm, columns::SUB_CATEGORY_CANDIDATES),
            reopen_count: one(cm, columns::REOPEN_COUNT),
        }
    }

    /// Read one dataset row through the negotiated columns.
    /// Unparsable dates, flags and counts are treated as absent.
    pub fn read_record(&self, dataset: &Dataset, row: usize) -> TicketRecord {
        let text = |col: Option<LogicalColumn>| -> Option<String> {
            col.and_then(|c| dataset.value_at(row, c.index))
                .map(str::to_string)
        };
        let raw = |col: Option<LogicalColumn>| col.and_then(|c| dataset.value_at(row, c.index));

        TicketRecord {
            row,
            ticket_id: text(self.ticket_id),
            status: raw(self.status)
                .map(normalize_status)
                .unwrap_or_default(),
            created: raw(self.created).and_then(parse_datetime),
            due_date: raw(self.due_date).and_then(parse_date),
            l1_due_date: raw(self.l1_due_date).and_then(parse_date),
            gitlab_due_date: raw(self.gitlab_due_date).and_then(parse_date),
            overdue: raw(self.overdue).and_then(parse_flag),
            classification: text(self.classification),
            program: text(self.program),
            department: text(self.department),
            module_lead: text(self.module_lead),
            engineer: text(self.engineer),
            solutions_engineer: text(self.solutions_engineer),
            group: text(self.group),
            product: text(self.product),
            priority: text(self.priority),
            subject: text(self.subject),
            gitlab_link: text(self.gitlab_link),
            resolution: text(self.resolution),
            sub_category: text(self.sub_category),
            reopen_count: raw(self.reopen_count).and_then(parse_count),
        }
    }
}

/// "  Assigned to Engineer! " → "assigned to engineer!"
pub fn normalize_status(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Negotiated schema plus every row read through it.
#[derive(Debug, Clone, Default)]
pub struct TicketBatch {
    pub schema: TicketSchema,
    pub records: Vec<TicketRecord>,
}

impl TicketBatch {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let schema = TicketSchema::negotiate(dataset.columns());
        log::debug!(
            "Schema: resolution={:?} sub_category={:?} created={:?}",
            schema.resolution.map(|c| c.name),
            schema.sub_category.map(|c| c.name),
            schema.created.map(|c| c.name),
        );
        let records = (0..dataset.len())
            .map(|row| schema.read_record(dataset, row))
            .collect();
        TicketBatch { schema, records }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_negotiate_candidates() {
        let cm = ColumnMap::from_names(["Subject", "Closure Comments", "Category Type", "Created Tim"]);
        let schema = TicketSchema::negotiate(&cm);
        assert_eq!(schema.resolution.map(|c| c.name), Some("Closure Comments"));
        assert_eq!(schema.sub_category.map(|c| c.name), Some("Category Type"));
        assert_eq!(schema.created.map(|c| c.name), Some("Created Tim"));
        assert!(schema.status.is_none());
    }

    #[test]
    fn test_created_time_prefers_full_header() {
        let cm = ColumnMap::from_names(["Created Tim", "Created Time (Ticket)"]);
        let schema = TicketSchema::negotiate(&cm);
        assert_eq!(schema.created.map(|c| c.index), Some(1));
    }

    #[test]
    fn test_read_record_normalizes() {
        let ds = Dataset::from_rows(
            &[
                "Ticket Id",
                "Status (Ticket)",
                "Gitlab Due date",
                "Is Overdue",
                "Number of Reopen",
                "Program Name",
            ],
            &[vec!["101", "  Assigned to Engineer! ", "2026-10-18", "TRUE", "2", "Acme"]],
        );
        let batch = TicketBatch::from_dataset(&ds);
        let t = &batch.records[0];
        assert_eq!(t.ticket_id.as_deref(), Some("101"));
        assert_eq!(t.status, "assigned to engineer!");
        assert_eq!(t.gitlab_due_date, NaiveDate::from_ymd_opt(2026, 10, 18));
        assert_eq!(t.overdue, Some(true));
        assert_eq!(t.reopen_count, Some(2.0));
        assert_eq!(t.program.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_unparsable_values_become_absent() {
        let ds = Dataset::from_rows(
            &["Gitlab Due date", "Is Overdue", "Number of Reopen", "Created Time (Ticket)"],
            &[vec!["soon", "perhaps", "many", "yesterday"]],
        );
        let batch = TicketBatch::from_dataset(&ds);
        let t = &batch.records[0];
        assert!(t.gitlab_due_date.is_none());
        assert!(t.overdue.is_none());
        assert!(t.reopen_count.is_none());
        assert!(t.created.is_none());
        assert_eq!(t.status, "");
    }
}
