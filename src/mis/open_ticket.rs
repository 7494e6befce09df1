// Open Ticket MIS: module lead, client and engineer SLA tables

use crate::analyzer::classifier::{SlaBasis, SlaClassifier};
use crate::analyzer::status::{is_open, partition};
use crate::mis::{
    append_sla_section, require_status, sort_by_created, MisContext, ReportKind, BY_CLIENT,
    BY_ENGINEER, BY_MODULE_LEAD,
};
use crate::report::aggregation::SlaLabels;
use crate::report::issue::ReportIssue;
use crate::report::table::{ReportOutput, ReportTable};

pub const NO_OPEN_TICKETS: &str = "No open tickets found";

pub fn build(ctx: &MisContext<'_>) -> Result<ReportOutput, ReportIssue> {
    require_status(ctx)?;

    let mut open = partition(ctx.tickets(), is_open);
    if open.is_empty() {
        return Err(ReportIssue::empty(NO_OPEN_TICKETS));
    }
    sort_by_created(&mut open);

    let classifier = SlaClassifier::new(ctx.today, SlaBasis::DueDateChain);
    let mut report = ReportTable::new();

    for (i, dim) in [BY_MODULE_LEAD, BY_CLIENT, BY_ENGINEER].iter().enumerate() {
        if i > 0 {
            report.blank();
        }
        append_sla_section(
            &mut report,
            dim,
            SlaLabels::open(dim.label),
            &open,
            &classifier,
            NO_OPEN_TICKETS,
        );
    }

    log::debug!("Open Ticket MIS: {} open tickets", open.len());

    Ok(ReportOutput::SingleTable {
        sheet: ReportKind::OpenTicket.sheet_name(),
        table: report,
        highlight: true,
    })
}
