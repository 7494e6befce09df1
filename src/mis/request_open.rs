// Request Ticket Open MIS: full raw projection plus days-open pivots

use crate::analyzer::temporal::days_open;
use crate::mis::raw::{project, RawColumn};
use crate::mis::MisContext;
use crate::parser::columns;
use crate::parser::deserializers::parse_datetime;
use crate::parser::schema::LogicalColumn;
use crate::parser::types::TicketRecord;
use crate::report::aggregation::GRAND_TOTAL;
use crate::report::issue::ReportIssue;
use crate::report::pivot::{pivot, PivotSpec};
use crate::report::table::{Cell, NamedTable, ReportOutput, ReportTable};

/// Day counts read the truncated header first when both are present.
const CREATED_FOR_DAYS: &[&str] = &["Created Tim", "Created Time (Ticket)"];

pub const RAW_SHEET: &str = "Request Open Ticket";
pub const SUMMARY_SHEET: &str = "MIS";

const RAW_COLUMNS: &[RawColumn] = &[
    RawColumn::named("Ticket Id"),
    RawColumn::named("Status (Ticket)"),
    RawColumn::named("Ticket Owner"),
    RawColumn::renamed("Created Tim", "Created Tim", Some("Created Time (Ticket)")),
    RawColumn::named("Due Date"),
    RawColumn::named("Ticket Closed Time"),
    RawColumn::named("Email (Contact)"),
    RawColumn::named("Category Type"),
    RawColumn::named("Priority (Ticket)"),
    RawColumn::named("Severity Classification"),
    RawColumn::named("Channel"),
    RawColumn::named("Total Time Spent"),
    RawColumn::named("Crossed Due Date"),
    RawColumn::named("L1-Due Date"),
    RawColumn::named("Request Sub Category"),
    RawColumn::renamed("Contact name", "Contact name", Some("Account Name")),
    RawColumn::named("Category Of Issue"),
    RawColumn::named("Gitlab Due date"),
    RawColumn::named("Gitlab Link"),
    RawColumn::named("Number of Reopen"),
    RawColumn::named("Is Overdue"),
    RawColumn::named("Support Plan Category"),
    RawColumn::named("Classifications"),
    RawColumn::named("Ticket Group"),
    RawColumn::named("Solutions Engineer"),
    RawColumn::named("Select Engineer"),
    RawColumn::named("Module Lead"),
    RawColumn::named("Program Name"),
    RawColumn::named("Department Name"),
    RawColumn::named("Product OR PS Ticket"),
    RawColumn::named("Subject"),
];

const EXTRA_HEADERS: [&str; 2] = ["Todays Date", "No of crossed days"];

struct Summary {
    title: &'static str,
    spec: PivotSpec,
    column: fn(&MisContext<'_>) -> Option<LogicalColumn>,
    key: fn(&TicketRecord) -> Option<&str>,
}

const fn days_spec(row_label: &'static str) -> PivotSpec {
    PivotSpec {
        row_label,
        total_label: GRAND_TOTAL,
        grand_total_row: true,
    }
}

const SUMMARIES: [Summary; 3] = [
    Summary {
        title: "SOLUTIONS ENGINEER WISE REPORT",
        spec: days_spec(columns::SOLUTIONS_ENGINEER),
        column: |ctx| ctx.batch.schema.solutions_engineer,
        key: |t| t.solutions_engineer.as_deref(),
    },
    Summary {
        title: "PROGRAM NAME WISE REPORT",
        spec: days_spec(columns::PROGRAM),
        column: |ctx| ctx.batch.schema.program,
        key: |t| t.program.as_deref(),
    },
    Summary {
        title: "SELECT ENGINEER WISE REPORT",
        spec: days_spec(columns::ENGINEER),
        column: |ctx| ctx.batch.schema.engineer,
        key: |t| t.engineer.as_deref(),
    },
];

pub fn build(ctx: &MisContext<'_>) -> Result<ReportOutput, ReportIssue> {
    let (_, created) = ctx
        .dataset
        .columns()
        .first_present(CREATED_FOR_DAYS)
        .ok_or_else(|| ReportIssue::missing_column("Created Time"))?;

    let now = ctx.today_midnight();
    let crossed_days = |t: &TicketRecord| -> i64 {
        ctx.dataset
            .value_at(t.row, created)
            .and_then(parse_datetime)
            .map(|c| days_open(c, now))
            .unwrap_or(0)
    };
    let tickets = ctx.tickets();

    let rows: Vec<usize> = tickets.iter().map(|t| t.row).collect();
    let raw = project(ctx.dataset, &rows, RAW_COLUMNS, &EXTRA_HEADERS, |row| {
        let days = tickets.get(row).map(crossed_days).unwrap_or(0);
        vec![Cell::Date(ctx.today), Cell::Int(days)]
    });

    let mut summary = ReportTable::new();
    for (i, s) in SUMMARIES.iter().enumerate() {
        if i > 0 {
            summary.blank();
        }
        summary.title(s.title);
        if (s.column)(ctx).is_none() {
            summary.append(ReportIssue::missing_column(s.spec.row_label).into_table());
            continue;
        }
        let items = tickets
            .iter()
            .filter_map(|t| (s.key)(t).map(|k| (k, crossed_days(t))));
        summary.append(pivot(items, &s.spec));
    }

    log::info!("Request Ticket Open MIS: {} rows", rows.len());

    Ok(ReportOutput::RawPlusSummary {
        raw: NamedTable::new(RAW_SHEET, raw),
        summary: NamedTable::new(SUMMARY_SHEET, summary),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::clock::FixedClock;
    use crate::config::AnalysisConfig;
    use crate::parser::types::Dataset;
    use crate::report::table::RowKind;

    fn run(headers: &[&str], rows: &[Vec<&str>]) -> Result<ReportOutput, ReportIssue> {
        let ds = Dataset::from_rows(headers, rows);
        let clock = FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        let config = AnalysisConfig::default();
        let ctx = MisContext::new(&ds, &clock, &config);
        build(&ctx)
    }

    fn split(out: ReportOutput) -> (NamedTable, NamedTable) {
        match out {
            ReportOutput::RawPlusSummary { raw, summary } => (raw, summary),
            other => panic!("Expected RawPlusSummary, got {:?}", other),
        }
    }

    fn texts(table: &ReportTable, row: usize) -> Vec<String> {
        table.rows[row].cells.iter().map(Cell::display).collect()
    }

    fn sample() -> (NamedTable, NamedTable) {
        split(
            run(
                &["Ticket Id", "Created Time (Ticket)", "Solutions Engineer", "Program Name"],
                &[
                    vec!["11", "2026-10-16 10:00:00", "Nila", "Acme"],
                    vec!["12", "2026-10-09 10:00:00", "Nila", ""],
                    vec!["13", "", "Omar", "Acme"],
                ],
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_raw_projection_with_computed_columns() {
        let (raw, _) = sample();
        assert_eq!(raw.name, RAW_SHEET);
        assert_eq!(
            texts(&raw.table, 0),
            vec!["Ticket Id", "Created Tim", "Solutions Engineer", "Program Name", "Todays Date", "No of crossed days"]
        );
        assert_eq!(
            texts(&raw.table, 1),
            vec!["11", "2026-10-16 10:00:00", "Nila", "Acme", "2026-10-19", "2"]
        );
        assert_eq!(texts(&raw.table, 2)[5], "9");
        // unreadable creation time counts as zero days
        assert_eq!(texts(&raw.table, 3)[5], "0");
    }

    #[test]
    fn test_summary_pivots() {
        let (_, summary) = sample();
        assert_eq!(summary.name, SUMMARY_SHEET);
        let t = &summary.table;
        assert_eq!(texts(t, 0), vec!["SOLUTIONS ENGINEER WISE REPORT"]);
        assert_eq!(texts(t, 1), vec!["Solutions Engineer", "0", "2", "9", "Grand Total"]);
        assert_eq!(texts(t, 2), vec!["Nila", "0", "1", "1", "2"]);
        assert_eq!(texts(t, 3), vec!["Omar", "1", "0", "0", "1"]);
        assert_eq!(t.rows[4].kind, RowKind::Total);
        assert_eq!(t.rows[5].kind, RowKind::Blank);

        // row without a program is left out of the program pivot
        assert_eq!(texts(t, 6), vec!["PROGRAM NAME WISE REPORT"]);
        assert_eq!(texts(t, 7), vec!["Program Name", "0", "2", "Grand Total"]);
        assert_eq!(texts(t, 8), vec!["Acme", "1", "1", "2"]);

        let engineer = t
            .rows
            .iter()
            .position(|r| r.cells.first().map(Cell::display).as_deref() == Some("SELECT ENGINEER WISE REPORT"))
            .unwrap();
        assert_eq!(t.rows[engineer + 1].kind, RowKind::Notice);
        assert_eq!(texts(t, engineer + 1), vec!["Select Engineer column not found"]);
    }

    #[test]
    fn test_crossed_days_prefer_truncated_created_header() {
        let (raw, summary) = split(
            run(
                &["Ticket Id", "Created Time (Ticket)", "Created Tim", "Solutions Engineer"],
                &[vec!["11", "2026-10-18 10:00:00", "2026-10-12 10:00:00", "Nila"]],
            )
            .unwrap(),
        );
        let days = raw.table.rows[1].cells.last().map(Cell::display);
        assert_eq!(days.as_deref(), Some("6"));
        assert_eq!(texts(&summary.table, 2), vec!["Nila", "1", "1"]);
    }

    #[test]
    fn test_requires_created_column() {
        let issue = run(&["Ticket Id"], &[vec!["1"]]).unwrap_err();
        assert_eq!(issue.to_string(), "Created Time column not found");
    }
}
