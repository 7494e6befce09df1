// Open Ticket Detailed MIS: department table, crossed and due-today ticket
// lists, days-open histogram, six SLA breakdowns, full open-ticket list

use crate::analyzer::classifier::{SlaBasis, SlaClassifier};
use crate::analyzer::status::{is_open, partition};
use crate::analyzer::temporal::days_open;
use crate::mis::open_ticket::NO_OPEN_TICKETS;
use crate::mis::{
    append_sla_section, require_status, sort_by_created, MisContext, ReportKind, BY_CLIENT,
    BY_DEPARTMENT, BY_ENGINEER, BY_GROUP, BY_MODULE_LEAD, BY_PRIORITY, BY_PRODUCT,
};
use crate::parser::columns;
use crate::parser::types::TicketRecord;
use crate::report::aggregation::{SlaLabels, GRAND_TOTAL};
use crate::report::issue::ReportIssue;
use crate::report::pivot::{pivot, PivotSpec};
use crate::report::table::{Cell, ReportOutput, ReportTable};

const LINK_HEADER: [&str; 4] = [
    columns::GITLAB_LINK,
    columns::ENGINEER,
    columns::PROGRAM,
    columns::DEPARTMENT,
];

const DETAIL_HEADER: [&str; 8] = [
    columns::GITLAB_LINK,
    columns::ENGINEER,
    columns::MODULE_LEAD,
    columns::TICKET_GROUP,
    columns::PRODUCT,
    columns::PROGRAM,
    columns::DEPARTMENT,
    columns::SUBJECT,
];

const DAYS_SPEC: PivotSpec = PivotSpec {
    row_label: "# of Days",
    total_label: GRAND_TOTAL,
    grand_total_row: false,
};

fn link_row(t: &TicketRecord) -> Vec<Cell> {
    vec![
        Cell::opt(t.gitlab_link.as_deref()),
        Cell::opt(t.engineer.as_deref()),
        Cell::opt(t.program.as_deref()),
        Cell::opt(t.department.as_deref()),
    ]
}

fn detail_row(t: &TicketRecord) -> Vec<Cell> {
    vec![
        Cell::opt(t.gitlab_link.as_deref()),
        Cell::opt(t.engineer.as_deref()),
        Cell::opt(t.module_lead.as_deref()),
        Cell::opt(t.group.as_deref()),
        Cell::opt(t.product.as_deref()),
        Cell::opt(t.program.as_deref()),
        Cell::opt(t.department.as_deref()),
        Cell::opt(t.subject.as_deref()),
    ]
}

/// Header and one link row per ticket, or `empty_message`.
fn ticket_list(tickets: &[&TicketRecord], empty_message: &str) -> ReportTable {
    if tickets.is_empty() {
        return ReportTable::notice_only(empty_message);
    }
    let mut table = ReportTable::new();
    table.header(&LINK_HEADER);
    for t in tickets {
        table.data(link_row(t));
    }
    table
}

pub fn build(ctx: &MisContext<'_>) -> Result<ReportOutput, ReportIssue> {
    require_status(ctx)?;

    let mut open = partition(ctx.tickets(), is_open);
    if open.is_empty() {
        return Err(ReportIssue::empty(NO_OPEN_TICKETS));
    }
    sort_by_created(&mut open);

    let classifier = SlaClassifier::new(ctx.today, SlaBasis::DueDateChain);
    let schema = &ctx.batch.schema;
    let mut report = ReportTable::new();

    // Department
    append_sla_section(
        &mut report,
        &BY_DEPARTMENT,
        SlaLabels::open(BY_DEPARTMENT.label),
        &open,
        &classifier,
        NO_OPEN_TICKETS,
    );
    report.blank();

    // Crossed SLA
    report.title("TICKETS CROSSED SLA WITH GITLAB LINKS");
    let crossed: Vec<&TicketRecord> = open
        .iter()
        .copied()
        .filter(|t| classifier.classify(t).is_crossed())
        .collect();
    report.append(ticket_list(&crossed, "No tickets crossed SLA"));
    report.blank();

    // Due today
    report.title("TICKETS WILL CROSS DUE DATE TODAY");
    if schema.gitlab_due_date.is_some() {
        let due: Vec<&TicketRecord> = open
            .iter()
            .copied()
            .filter(|t| classifier.due_today(t))
            .collect();
        report.append(ticket_list(&due, "No tickets due today"));
    } else {
        report.append(ReportIssue::missing_column(columns::GITLAB_DUE_DATE).into_table());
    }
    report.blank();

    // Days open
    report.title("NUMBER OF DAYS CROSSED - OPEN TICKETS");
    let now = ctx.today_midnight();
    let days = open
        .iter()
        .map(|t| ("Count", t.created.map(|c| days_open(c, now)).unwrap_or(0)));
    report.append(pivot(days, &DAYS_SPEC));
    report.blank();

    for dim in [BY_MODULE_LEAD, BY_CLIENT, BY_ENGINEER] {
        append_sla_section(
            &mut report,
            &dim,
            SlaLabels::open(dim.label),
            &open,
            &classifier,
            NO_OPEN_TICKETS,
        );
        report.blank();
    }

    // Optional dimensions report their absence instead of a blank group
    for (dim, present) in [
        (BY_PRODUCT, schema.product.is_some()),
        (BY_GROUP, schema.group.is_some()),
        (BY_PRIORITY, schema.priority.is_some()),
    ] {
        if present {
            append_sla_section(
                &mut report,
                &dim,
                SlaLabels::open(dim.label),
                &open,
                &classifier,
                NO_OPEN_TICKETS,
            );
        } else {
            report.title(dim.title);
            report.append(ReportIssue::missing_column(dim.label).into_table());
        }
        report.blank();
    }

    report.title("TOTAL OPEN TICKETS");
    report.header(&DETAIL_HEADER);
    for t in &open {
        report.data(detail_row(t));
    }

    log::debug!(
        "Open Ticket Detailed MIS: {} open, {} crossed",
        open.len(),
        crossed.len()
    );

    Ok(ReportOutput::SingleTable {
        sheet: ReportKind::OpenTicketDetailed.sheet_name(),
        table: report,
        highlight: true,
    })
}
