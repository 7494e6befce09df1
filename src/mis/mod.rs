//! Report assembly: one module per MIS report type.
//!
//! Every report reads the same [`MisContext`] (dataset, negotiated tickets,
//! the run's date) and returns a [`ReportOutput`]. Recoverable problems
//! such as a missing column or an empty filter come back as a one-row
//! notice table, never as an error.

pub mod bug_closed;
pub mod client;
pub mod open_detailed;
pub mod open_ticket;
pub mod raw;
pub mod recurring;
pub mod request_closed;
pub mod request_open;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::analyzer::classifier::SlaClassifier;
use crate::clock::Clock;
use crate::config::AnalysisConfig;
use crate::error::AppError;
use crate::parser::columns;
use crate::parser::schema::{LogicalColumn, TicketBatch};
use crate::parser::types::{Dataset, TicketRecord};
use crate::report::aggregation::{SlaLabels, SlaTable};
use crate::report::issue::ReportIssue;
use crate::report::table::{ReportOutput, ReportTable};

// ── Report kinds ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ReportKind {
    OpenTicket,
    OpenTicketDetailed,
    Client,
    RequestOpen,
    RequestClosed,
    BugClosed,
    RecurringIssues,
}

impl ReportKind {
    pub const ALL: [ReportKind; 7] = [
        ReportKind::OpenTicket,
        ReportKind::OpenTicketDetailed,
        ReportKind::Client,
        ReportKind::RequestOpen,
        ReportKind::RequestClosed,
        ReportKind::BugClosed,
        ReportKind::RecurringIssues,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ReportKind::OpenTicket => "Open Ticket MIS",
            ReportKind::OpenTicketDetailed => "Open Ticket Detailed MIS",
            ReportKind::Client => "Client MIS",
            ReportKind::RequestOpen => "Request Ticket Open MIS",
            ReportKind::RequestClosed => "Request Ticket Closed MIS",
            ReportKind::BugClosed => "Bug Ticket Closed MIS",
            ReportKind::RecurringIssues => "Recurring Issues MIS",
        }
    }

    /// Command-line spelling.
    pub fn slug(self) -> &'static str {
        match self {
            ReportKind::OpenTicket => "open-ticket",
            ReportKind::OpenTicketDetailed => "open-ticket-detailed",
            ReportKind::Client => "client",
            ReportKind::RequestOpen => "request-open",
            ReportKind::RequestClosed => "request-closed",
            ReportKind::BugClosed => "bug-closed",
            ReportKind::RecurringIssues => "recurring-issues",
        }
    }

    /// "Open Ticket MIS" → "Open_Ticket_MIS"
    pub fn sheet_name(self) -> String {
        self.label().replace(' ', "_")
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReportKind {
    type Err = AppError;

    /// Accepts the slug, the label or the sheet name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if wanted == "jagan's mis" {
            return Ok(ReportKind::OpenTicketDetailed);
        }
        ReportKind::ALL
            .into_iter()
            .find(|k| {
                wanted == k.slug()
                    || wanted == k.label().to_lowercase()
                    || wanted == k.sheet_name().to_lowercase()
            })
            .ok_or_else(|| AppError::UnknownReport(s.to_string()))
    }
}

// ── Context ───────────────────────────────────────────────────────────────────

/// Everything a report reads, computed once per run.
pub struct MisContext<'a> {
    pub dataset: &'a Dataset,
    pub batch: TicketBatch,
    pub today: NaiveDate,
    pub config: &'a AnalysisConfig,
}

impl<'a> MisContext<'a> {
    pub fn new(dataset: &'a Dataset, clock: &dyn Clock, config: &'a AnalysisConfig) -> Self {
        MisContext {
            dataset,
            batch: TicketBatch::from_dataset(dataset),
            today: clock.today(),
            config,
        }
    }

    pub fn tickets(&self) -> &[TicketRecord] {
        &self.batch.records
    }

    pub fn today_midnight(&self) -> NaiveDateTime {
        self.today.and_time(NaiveTime::MIN)
    }
}

/// `MissingColumn` unless the logical field was negotiated.
pub(crate) fn require(column: Option<LogicalColumn>, name: &str) -> Result<LogicalColumn, ReportIssue> {
    column.ok_or_else(|| ReportIssue::missing_column(name))
}

pub(crate) fn require_status(ctx: &MisContext<'_>) -> Result<LogicalColumn, ReportIssue> {
    require(ctx.batch.schema.status, columns::STATUS)
}

// ── Dimensions ────────────────────────────────────────────────────────────────

/// A breakdown axis of the SLA tables.
#[derive(Clone, Copy)]
pub(crate) struct Dimension {
    pub title: &'static str,
    pub label: &'static str,
    pub key: fn(&TicketRecord) -> Option<&str>,
}

fn module_lead(t: &TicketRecord) -> Option<&str> {
    t.module_lead.as_deref()
}

fn program(t: &TicketRecord) -> Option<&str> {
    t.program.as_deref()
}

fn engineer(t: &TicketRecord) -> Option<&str> {
    t.engineer.as_deref()
}

fn department(t: &TicketRecord) -> Option<&str> {
    t.department.as_deref()
}

fn product(t: &TicketRecord) -> Option<&str> {
    t.product.as_deref()
}

fn group(t: &TicketRecord) -> Option<&str> {
    t.group.as_deref()
}

fn priority(t: &TicketRecord) -> Option<&str> {
    t.priority.as_deref()
}

pub(crate) const BY_MODULE_LEAD: Dimension = Dimension {
    title: "MODULE LEAD WISE REPORT",
    label: "Module Lead",
    key: module_lead,
};

pub(crate) const BY_CLIENT: Dimension = Dimension {
    title: "CLIENT WISE REPORT",
    label: "Client Name",
    key: program,
};

pub(crate) const BY_ENGINEER: Dimension = Dimension {
    title: "ENGINEER WISE REPORT",
    label: "Engineer",
    key: engineer,
};

pub(crate) const BY_DEPARTMENT: Dimension = Dimension {
    title: "DEPARTMENT WISE SLA STATUS - OPEN TICKETS",
    label: "Department Name",
    key: department,
};

pub(crate) const BY_PRODUCT: Dimension = Dimension {
    title: "PRODUCT/PS WISE REPORT",
    label: columns::PRODUCT,
    key: product,
};

pub(crate) const BY_GROUP: Dimension = Dimension {
    title: "TICKET GROUP WISE REPORT",
    label: columns::TICKET_GROUP,
    key: group,
};

pub(crate) const BY_PRIORITY: Dimension = Dimension {
    title: "PRIORITY WISE REPORT",
    label: columns::PRIORITY,
    key: priority,
};

/// Title row followed by the SLA table of `tickets` along `dim`.
pub(crate) fn append_sla_section(
    report: &mut ReportTable,
    dim: &Dimension,
    labels: SlaLabels,
    tickets: &[&TicketRecord],
    classifier: &SlaClassifier,
    empty_message: &'static str,
) {
    report.title(dim.title);
    report.append(SlaTable::new(labels, empty_message).build(
        tickets,
        dim.key,
        |t| classifier.classify(t),
    ));
}

/// Oldest first; tickets without a readable creation time go last.
pub(crate) fn sort_by_created(tickets: &mut [&TicketRecord]) {
    tickets.sort_by_key(|t| (t.created.is_none(), t.created));
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Run one report over a loaded dataset.
pub fn generate(
    kind: ReportKind,
    dataset: &Dataset,
    clock: &dyn Clock,
    config: &AnalysisConfig,
) -> ReportOutput {
    let ctx = MisContext::new(dataset, clock, config);
    log::info!(
        "Generating {} over {} tickets (today {})",
        kind,
        ctx.tickets().len(),
        ctx.today
    );

    let result = match kind {
        ReportKind::OpenTicket => open_ticket::build(&ctx),
        ReportKind::OpenTicketDetailed => open_detailed::build(&ctx),
        ReportKind::Client => client::build(&ctx),
        ReportKind::RequestOpen => request_open::build(&ctx),
        ReportKind::RequestClosed => request_closed::build(&ctx),
        ReportKind::BugClosed => bug_closed::build(&ctx),
        ReportKind::RecurringIssues => recurring::build(&ctx),
    };

    result.unwrap_or_else(|issue| {
        log::warn!("{}: {}", kind, issue);
        ReportOutput::SingleTable {
            sheet: kind.sheet_name(),
            table: issue.into_table(),
            highlight: false,
        }
    })
}
