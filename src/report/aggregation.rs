//! Grouped SLA aggregation, the building block of every breakdown table.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analyzer::classifier::SlaStatus;
use crate::analyzer::stats::split_pct;
use crate::parser::types::TicketRecord;
use crate::report::table::{Cell, ReportTable};

/// Group label for tickets without a dimension value.
pub const BLANK_KEY: &str = "(Blank)";
pub const GRAND_TOTAL: &str = "Grand Total";

/// Column vocabulary of one SLA table.
#[derive(Debug, Clone, Copy)]
pub struct SlaLabels {
    pub dimension: &'static str,
    pub within: &'static str,
    pub crossed: &'static str,
    pub total: &'static str,
}

impl SlaLabels {
    /// The labels used by the open-ticket tables.
    pub const fn open(dimension: &'static str) -> Self {
        SlaLabels {
            dimension,
            within: "Within SLA",
            crossed: "Crossed SLA",
            total: "Grand Total",
        }
    }

    pub fn header(&self) -> [&'static str; 6] {
        [
            self.dimension,
            self.within,
            self.crossed,
            self.total,
            "Within SLA%",
            "Crossed SLA%",
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationRow {
    pub key: String,
    pub within: usize,
    pub crossed: usize,
    pub total: usize,
    pub within_pct: u32,
    pub crossed_pct: u32,
}

impl AggregationRow {
    pub fn from_counts(key: impl Into<String>, within: usize, crossed: usize) -> Self {
        let (within_pct, crossed_pct) = split_pct(within, crossed);
        AggregationRow {
            key: key.into(),
            within,
            crossed,
            total: within + crossed,
            within_pct,
            crossed_pct,
        }
    }

    pub fn cells(&self) -> Vec<Cell> {
        vec![
            Cell::text(self.key.as_str()),
            Cell::count(self.within),
            Cell::count(self.crossed),
            Cell::count(self.total),
            Cell::Percent(self.within_pct),
            Cell::Percent(self.crossed_pct),
        ]
    }
}

/// Data rows (worst crossed share first) and the grand total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlaAggregation {
    pub rows: Vec<AggregationRow>,
    pub grand_total: AggregationRow,
}

/// Group tickets by `key_fn`, count each SLA status, derive percentages.
///
/// Rows come out ordered by key, then stably re-sorted by crossed
/// percentage descending. The grand total sums the counts.
pub fn aggregate<'a>(
    tickets: impl IntoIterator<Item = &'a TicketRecord>,
    key_fn: impl Fn(&TicketRecord) -> Option<&str>,
    status_fn: impl Fn(&TicketRecord) -> SlaStatus,
) -> SlaAggregation {
    let mut groups: BTreeMap<String, (usize, usize)> = BTreeMap::new();

    for ticket in tickets {
        let key = key_fn(ticket).unwrap_or(BLANK_KEY).to_string();
        let entry = groups.entry(key).or_insert((0, 0));
        match status_fn(ticket) {
            SlaStatus::WithinSla => entry.0 += 1,
            SlaStatus::CrossedSla => entry.1 += 1,
        }
    }

    let mut rows: Vec<AggregationRow> = groups
        .into_iter()
        .map(|(key, (within, crossed))| AggregationRow::from_counts(key, within, crossed))
        .collect();
    rows.sort_by(|a, b| b.crossed_pct.cmp(&a.crossed_pct));

    let within: usize = rows.iter().map(|r| r.within).sum();
    let crossed: usize = rows.iter().map(|r| r.crossed).sum();
    let grand_total = AggregationRow::from_counts(GRAND_TOTAL, within, crossed);

    SlaAggregation { rows, grand_total }
}

/// How an SLA table is rendered.
#[derive(Debug, Clone, Copy)]
pub struct SlaTable {
    pub labels: SlaLabels,
    /// Notice shown instead of the table when no ticket is given.
    pub empty_message: &'static str,
    pub grand_total: bool,
}

impl SlaTable {
    pub fn new(labels: SlaLabels, empty_message: &'static str) -> Self {
        SlaTable {
            labels,
            empty_message,
            grand_total: true,
        }
    }

    pub fn without_grand_total(mut self) -> Self {
        self.grand_total = false;
        self
    }

    /// Header, data rows and optional grand total; a lone notice on empty input.
    pub fn build<'a>(
        &self,
        tickets: &[&'a TicketRecord],
        key_fn: impl Fn(&TicketRecord) -> Option<&str>,
        status_fn: impl Fn(&TicketRecord) -> SlaStatus,
    ) -> ReportTable {
        if tickets.is_empty() {
            return ReportTable::notice_only(self.empty_message);
        }

        let agg = aggregate(tickets.iter().copied(), key_fn, status_fn);
        self.render(&agg)
    }

    pub fn render(&self, agg: &SlaAggregation) -> ReportTable {
        let mut table = ReportTable::new();
        table.header(&self.labels.header());
        for row in &agg.rows {
            table.data(row.cells());
        }
        if self.grand_total {
            table.total(agg.grand_total.cells());
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::table::RowKind;

    fn t(key: Option<&str>, overdue: bool) -> TicketRecord {
        TicketRecord {
            module_lead: key.map(str::to_string),
            overdue: Some(overdue),
            ..Default::default()
        }
    }

    fn by_flag(ticket: &TicketRecord) -> SlaStatus {
        if ticket.overdue == Some(true) {
            SlaStatus::CrossedSla
        } else {
            SlaStatus::WithinSla
        }
    }

    fn lead(ticket: &TicketRecord) -> Option<&str> {
        ticket.module_lead.as_deref()
    }

    #[test]
    fn test_constant_key_half_and_half() {
        let tickets = vec![t(Some("All"), false), t(Some("All"), true)];
        let agg = aggregate(&tickets, lead, by_flag);
        assert_eq!(agg.rows.len(), 1);
        assert_eq!(agg.rows[0], AggregationRow::from_counts("All", 1, 1));
        assert_eq!(agg.rows[0].within_pct, 50);
        assert_eq!(agg.rows[0].crossed_pct, 50);
        assert_eq!(agg.grand_total.total, 2);
    }

    #[test]
    fn test_sorted_by_crossed_pct_desc_stable() {
        let tickets = vec![
            t(Some("Beta"), false),
            t(Some("Alpha"), false),
            t(Some("Gamma"), true),
            t(Some("Gamma"), false),
            t(Some("Delta"), true),
        ];
        let agg = aggregate(&tickets, lead, by_flag);
        let keys: Vec<&str> = agg.rows.iter().map(|r| r.key.as_str()).collect();
        // Delta 100%, Gamma 50%, then Alpha/Beta tied at 0% in key order
        assert_eq!(keys, vec!["Delta", "Gamma", "Alpha", "Beta"]);
    }

    #[test]
    fn test_grand_total_sums_counts() {
        let tickets = vec![
            t(Some("A"), true),
            t(Some("A"), false),
            t(Some("A"), false),
            t(Some("B"), true),
        ];
        let agg = aggregate(&tickets, lead, by_flag);
        let within: usize = agg.rows.iter().map(|r| r.within).sum();
        let crossed: usize = agg.rows.iter().map(|r| r.crossed).sum();
        assert_eq!(agg.grand_total.within, within);
        assert_eq!(agg.grand_total.crossed, crossed);
        assert_eq!(agg.grand_total.crossed_pct, 50);
        for row in &agg.rows {
            assert_eq!(row.within_pct + row.crossed_pct, 100);
        }
    }

    #[test]
    fn test_missing_key_is_blank_group() {
        let tickets = vec![t(None, false), t(Some("A"), false)];
        let agg = aggregate(&tickets, lead, by_flag);
        assert!(agg.rows.iter().any(|r| r.key == BLANK_KEY));
    }

    #[test]
    fn test_zero_total_renders_zero_pct() {
        let row = AggregationRow::from_counts("Acme", 0, 0);
        assert_eq!(row.within_pct, 0);
        assert_eq!(row.crossed_pct, 0);
        assert_eq!(row.cells()[4], Cell::Percent(0));
    }

    #[test]
    fn test_build_table_layout() {
        let tickets = vec![t(Some("A"), true), t(Some("B"), false)];
        let refs: Vec<&TicketRecord> = tickets.iter().collect();
        let spec = SlaTable::new(SlaLabels::open("Module Lead"), "No open tickets found");
        let table = spec.build(&refs, lead, by_flag);
        assert_eq!(table.rows[0].kind, RowKind::Header);
        assert_eq!(table.rows[0].cells[0], Cell::text("Module Lead"));
        assert_eq!(table.rows.last().map(|r| r.kind), Some(RowKind::Total));
        assert_eq!(table.rows.last().unwrap().cells[0], Cell::text(GRAND_TOTAL));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_build_empty_is_notice() {
        let spec = SlaTable::new(SlaLabels::open("Engineer"), "No open tickets found");
        let table = spec.build(&[], lead, by_flag);
        assert!(table.is_notice());
        assert_eq!(table.rows[0].cells[0], Cell::text("No open tickets found"));
    }

    #[test]
    fn test_without_grand_total() {
        let tickets = vec![t(Some("Acme"), true)];
        let refs: Vec<&TicketRecord> = tickets.iter().collect();
        let spec = SlaTable::new(SlaLabels::open("Client Name"), "none").without_grand_total();
        let table = spec.build(&refs, lead, by_flag);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1].kind, RowKind::Data);
    }
}
