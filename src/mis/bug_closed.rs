// Bug Ticket Closed MIS: SLA tables over closed bugs, judged on the
// overdue flag recorded at closure

use crate::analyzer::classifier::{SlaBasis, SlaClassifier};
use crate::analyzer::status::{is_closed_or_lack_of_info, partition};
use crate::mis::{
    append_sla_section, require_status, MisContext, ReportKind, BY_CLIENT, BY_ENGINEER,
    BY_MODULE_LEAD,
};
use crate::report::aggregation::SlaLabels;
use crate::report::issue::ReportIssue;
use crate::report::table::{ReportOutput, ReportTable};

const NO_CLOSED_BUGS: &str = "No closed bug tickets found";

const fn closed_bug_labels(dimension: &'static str) -> SlaLabels {
    SlaLabels {
        dimension,
        within: "Closed Bug Within SLA",
        crossed: "Closed Bug Crossed SLA",
        total: "Total Closed Bugs",
    }
}

pub fn build(ctx: &MisContext<'_>) -> Result<ReportOutput, ReportIssue> {
    require_status(ctx)?;

    let closed = partition(ctx.tickets(), is_closed_or_lack_of_info);
    if closed.is_empty() {
        return Err(ReportIssue::empty(NO_CLOSED_BUGS));
    }

    let classifier = SlaClassifier::new(ctx.today, SlaBasis::OverdueFlag);
    let mut report = ReportTable::new();

    for (i, dim) in [BY_MODULE_LEAD, BY_CLIENT, BY_ENGINEER].iter().enumerate() {
        if i > 0 {
            report.blank();
        }
        append_sla_section(
            &mut report,
            dim,
            closed_bug_labels(dim.label),
            &closed,
            &classifier,
            NO_CLOSED_BUGS,
        );
    }

    log::debug!("Bug Ticket Closed MIS: {} closed tickets", closed.len());

    Ok(ReportOutput::SingleTable {
        sheet: ReportKind::BugClosed.sheet_name(),
        table: report,
        highlight: false,
    })
}
