// Client MIS: per program, closed / open / request sections and raw tables

use crate::analyzer::classifier::{SlaBasis, SlaClassifier};
use crate::analyzer::status::{has_open_status, is_client_group, is_closed, is_open, is_request};
use crate::mis::raw::{project, RawColumn};
use crate::mis::{require, require_status, MisContext};
use crate::parser::columns;
use crate::parser::types::TicketRecord;
use crate::report::aggregation::{AggregationRow, SlaAggregation, SlaLabels, SlaTable};
use crate::report::issue::ReportIssue;
use crate::report::table::{Cell, KeyedEntry, NamedTable, ReportOutput, ReportTable};

pub const SHEET_MIS: &str = "Client_MIS";
pub const SHEET_OPEN: &str = "Open_Tickets";
pub const SHEET_CLOSED: &str = "Closed_Tickets";
pub const SHEET_REQUEST: &str = "Request_Tickets";

const CLOSED_LABELS: SlaLabels = SlaLabels {
    dimension: "Client Name",
    within: "Closed Tickets Within SLA",
    crossed: "Closed Tickets Crossed SLA",
    total: "Total Closed Tickets",
};

const OPEN_LABELS: SlaLabels = SlaLabels {
    dimension: "Client Name",
    within: "Open tickets within SLA",
    crossed: "Open Tickets Crossed SLA",
    total: "Total Open Tickets",
};

const REQUEST_HEADER: [&str; 4] = ["Client Name", "Request Closed", "Request Open", "Grand Total"];

const RAW_COLUMNS: &[RawColumn] = &[
    RawColumn::named("Ticket Id"),
    RawColumn::named("Status (Ticket)"),
    RawColumn::renamed("Created Time (Ticket)", "Created Time (Ticket)", Some("Created Tim")),
    RawColumn::named("Due Date"),
    RawColumn::named("Email (Contact)"),
    RawColumn::named("Priority (Ticket)"),
    RawColumn::renamed("Client Name", "Program Name", None),
    RawColumn::named("Crossed Due Date"),
    RawColumn::named("Request Sub Category"),
    RawColumn::renamed("Contact name", "Contact name", Some("Account Name")),
];

/// One-row SLA table for a program; zero counts when nothing matches.
fn program_sla(
    program: &str,
    tickets: &[&TicketRecord],
    labels: SlaLabels,
    classifier: &SlaClassifier,
) -> ReportTable {
    let crossed = tickets
        .iter()
        .filter(|t| classifier.classify(t).is_crossed())
        .count();
    let row = AggregationRow::from_counts(program, tickets.len() - crossed, crossed);
    let agg = SlaAggregation {
        rows: vec![row.clone()],
        grand_total: row,
    };
    SlaTable::new(labels, "").without_grand_total().render(&agg)
}

fn mis_sheet(
    program: &str,
    tickets: &[&TicketRecord],
    has_classification: bool,
    classifier: &SlaClassifier,
) -> ReportTable {
    let mut report = ReportTable::new();

    let closed: Vec<&TicketRecord> = tickets.iter().copied().filter(|t| is_closed(t)).collect();
    report.title(format!("{} - Closed Tickets:", program));
    report.blank();
    report.append(program_sla(program, &closed, CLOSED_LABELS, classifier));
    report.blank();
    report.blank();

    let open: Vec<&TicketRecord> = tickets.iter().copied().filter(|t| is_open(t)).collect();
    report.title(format!("{} - Open Tickets:", program));
    report.blank();
    report.append(program_sla(program, &open, OPEN_LABELS, classifier));
    report.blank();
    report.blank();

    let requests = tickets
        .iter()
        .filter(|t| is_request(t, has_classification));
    let (mut request_closed, mut request_open) = (0, 0);
    for t in requests {
        if is_closed(t) {
            request_closed += 1;
        } else if has_open_status(t) {
            request_open += 1;
        }
    }
    report.title(format!("{} - Request Tickets:", program));
    report.blank();
    report.header(&REQUEST_HEADER);
    report.data(vec![
        Cell::text(program),
        Cell::count(request_closed),
        Cell::count(request_open),
        Cell::count(request_closed + request_open),
    ]);

    report
}

pub fn build(ctx: &MisContext<'_>) -> Result<ReportOutput, ReportIssue> {
    let schema = &ctx.batch.schema;
    require(schema.program, columns::PROGRAM)?;
    require(schema.group, columns::TICKET_GROUP)?;
    require_status(ctx)?;

    let client: Vec<&TicketRecord> = ctx
        .tickets()
        .iter()
        .filter(|t| is_client_group(t))
        .collect();
    if client.is_empty() {
        return Err(ReportIssue::empty("No client tickets found"));
    }

    // programs in first-appearance order; rows without one are skipped
    let mut programs: Vec<&str> = Vec::new();
    for t in &client {
        if let Some(p) = t.program.as_deref() {
            if !programs.contains(&p) {
                programs.push(p);
            }
        }
    }

    let classifier = SlaClassifier::new(ctx.today, SlaBasis::OverdueFlag);
    let has_classification = schema.classification.is_some();

    let entries = programs
        .into_iter()
        .map(|program| {
            let tickets: Vec<&TicketRecord> = client
                .iter()
                .copied()
                .filter(|t| t.program.as_deref() == Some(program))
                .collect();
            let rows = |pred: &dyn Fn(&TicketRecord) -> bool| -> Vec<usize> {
                tickets.iter().filter(|t| pred(t)).map(|t| t.row).collect()
            };
            let raw = |pred: &dyn Fn(&TicketRecord) -> bool| {
                project(ctx.dataset, &rows(pred), RAW_COLUMNS, &[], |_| Vec::new())
            };

            KeyedEntry {
                key: program.to_string(),
                tables: vec![
                    NamedTable::new(
                        SHEET_MIS,
                        mis_sheet(program, &tickets, has_classification, &classifier),
                    ),
                    NamedTable::new(SHEET_OPEN, raw(&has_open_status)),
                    NamedTable::new(SHEET_CLOSED, raw(&is_closed)),
                    NamedTable::new(SHEET_REQUEST, raw(&|t| is_request(t, has_classification))),
                ],
            }
        })
        .collect::<Vec<_>>();

    log::info!("Client MIS: {} programs", entries.len());

    Ok(ReportOutput::KeyedBundle { entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::clock::FixedClock;
    use crate::config::AnalysisConfig;
    use crate::parser::types::Dataset;
    use crate::report::table::RowKind;

    const HEADERS: &[&str] = &[
        "Ticket Id",
        "Status (Ticket)",
        "Program Name",
        "Ticket Group",
        "Is Overdue",
        "Classifications",
        "Account Name",
    ];

    fn run(headers: &[&str], rows: &[Vec<&str>]) -> Result<ReportOutput, ReportIssue> {
        let ds = Dataset::from_rows(headers, rows);
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        let config = AnalysisConfig::default();
        let ctx = MisContext::new(&ds, &clock, &config);
        build(&ctx)
    }

    fn entries(out: ReportOutput) -> Vec<KeyedEntry> {
        match out {
            ReportOutput::KeyedBundle { entries } => entries,
            other => panic!("Expected KeyedBundle, got {:?}", other),
        }
    }

    fn texts(table: &ReportTable, row: usize) -> Vec<String> {
        table.rows[row].cells.iter().map(Cell::display).collect()
    }

    fn sample() -> Vec<KeyedEntry> {
        entries(
            run(
                HEADERS,
                &[
                    vec!["1", "Closed", "Acme", "Client Support", "false", "Bug", "Dana"],
                    vec!["2", "Closed", "Acme", "Client Support", "true", "Service Request", "Eli"],
                    vec!["3", "Reopened", "Globex", "client-L2", "true", "Bug", ""],
                    vec!["4", "Closed", "Acme", "Internal", "true", "Bug", ""],
                    vec!["5", "Waiting Information From user - 1", "Acme", "Client Support", "", "Request Open", ""],
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_programs_in_appearance_order() {
        let entries = sample();
        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["Acme", "Globex"]);
        let sheets: Vec<&str> = entries[0].tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(sheets, vec![SHEET_MIS, SHEET_OPEN, SHEET_CLOSED, SHEET_REQUEST]);
    }

    #[test]
    fn test_mis_sections() {
        let entries = sample();
        let mis = &entries[0].tables[0].table;
        assert_eq!(texts(mis, 0), vec!["Acme - Closed Tickets:"]);
        assert_eq!(mis.rows[1].kind, RowKind::Blank);
        assert_eq!(texts(mis, 2)[1], "Closed Tickets Within SLA");
        // closed flag false / true, internal ticket 4 excluded
        assert_eq!(texts(mis, 3), vec!["Acme", "1", "1", "2", "50%", "50%"]);
        assert_eq!(mis.rows[4].kind, RowKind::Blank);
        assert_eq!(mis.rows[5].kind, RowKind::Blank);

        // the waiting request-open ticket is not an open ticket: zero row
        assert_eq!(texts(mis, 6), vec!["Acme - Open Tickets:"]);
        assert_eq!(texts(mis, 9), vec!["Acme", "0", "0", "0", "0%", "0%"]);

        assert_eq!(texts(mis, 12), vec!["Acme - Request Tickets:"]);
        assert_eq!(texts(mis, 14), REQUEST_HEADER.to_vec());
        assert_eq!(texts(mis, 15), vec!["Acme", "1", "1", "2"]);
        assert_eq!(mis.len(), 16);
    }

    #[test]
    fn test_raw_tables() {
        let entries = sample();
        let open = &entries[0].tables[1].table;
        assert_eq!(
            texts(open, 0),
            vec!["Ticket Id", "Status (Ticket)", "Client Name", "Contact name"]
        );
        assert_eq!(texts(open, 1), vec!["5", "Waiting Information From user - 1", "Acme", ""]);

        let closed = &entries[0].tables[2].table;
        assert_eq!(closed.len(), 3);
        assert_eq!(texts(closed, 2), vec!["2", "Closed", "Acme", "Eli"]);

        let request = &entries[0].tables[3].table;
        let ids: Vec<String> = (1..request.len()).map(|i| texts(request, i)[0].clone()).collect();
        assert_eq!(ids, vec!["2", "5"]);
    }

    #[test]
    fn test_required_columns() {
        let issue = run(&["Status (Ticket)", "Ticket Group"], &[vec!["Closed", "Client"]]).unwrap_err();
        assert_eq!(issue.to_string(), "Program Name column not found");
        let issue = run(&["Status (Ticket)", "Program Name"], &[vec!["Closed", "Acme"]]).unwrap_err();
        assert_eq!(issue.to_string(), "Ticket Group column not found");
    }

    #[test]
    fn test_no_client_tickets() {
        let issue = run(HEADERS, &[vec!["1", "Closed", "Acme", "Internal", "", "", ""]]).unwrap_err();
        assert_eq!(issue, ReportIssue::empty("No client tickets found"));
    }
}
