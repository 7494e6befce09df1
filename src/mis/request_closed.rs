// Request Ticket Closed MIS: engineer × priority counts of closed tickets

use crate::analyzer::status::{is_closed, partition};
use crate::mis::{require, require_status, MisContext, ReportKind};
use crate::parser::columns;
use crate::report::issue::ReportIssue;
use crate::report::pivot::{pivot, PivotSpec};
use crate::report::table::ReportOutput;

const SPEC: PivotSpec = PivotSpec {
    row_label: columns::ENGINEER,
    total_label: "Total",
    grand_total_row: false,
};

pub fn build(ctx: &MisContext<'_>) -> Result<ReportOutput, ReportIssue> {
    require_status(ctx)?;

    let closed = partition(ctx.tickets(), is_closed);
    if closed.is_empty() {
        return Err(ReportIssue::empty("No closed request tickets found"));
    }

    let schema = &ctx.batch.schema;
    require(schema.engineer, columns::ENGINEER)?;
    require(schema.priority, columns::PRIORITY)?;

    let items = closed.iter().filter_map(|t| {
        let engineer = t.engineer.as_deref()?;
        let priority = t.priority.as_deref()?;
        Some((engineer, priority))
    });
    let table = pivot(items, &SPEC);

    log::info!("Request Ticket Closed MIS: {} closed tickets", closed.len());

    Ok(ReportOutput::SingleTable {
        sheet: ReportKind::RequestClosed.sheet_name(),
        table,
        highlight: false,
    })
}
