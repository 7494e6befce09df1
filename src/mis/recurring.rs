// Recurring Issues MIS: five stacked sections over the discovered clusters

use crate::analytics::breakdown::{category_breakdown, engineer_performance};
use crate::analytics::recurring::{
    discover, display_pattern, ClusterMetrics, ExecutiveSummary, TrendPeriod,
};
use crate::analytics::{CategoryStat, EngineerStat};
use crate::mis::{MisContext, ReportKind};
use crate::report::issue::ReportIssue;
use crate::report::table::{Cell, ReportOutput, ReportTable};

const UNKNOWN: &str = "Unknown";

const TOP_HEADER: [&str; 11] = [
    "Rank",
    "Issue Pattern",
    "Occurrences",
    "Programs Affected",
    "Engineers Involved",
    "Resolution Rate",
    "Avg Reopens",
    "First Occurrence",
    "Last Occurrence",
    "Impact Level",
    "Recommended Action",
];

const CATEGORY_HEADER: [&str; 4] = [
    "Ticket Sub Category",
    "Recurring Patterns",
    "Total Recurring Tickets",
    "Avg Tickets per Pattern",
];

const ENGINEER_HEADER: [&str; 7] = [
    "Engineer",
    "Recurring Issues Handled",
    "Unique Patterns",
    "Resolution Rate",
    "Avg Reopens",
    "Performance Score",
    "Focus Area",
];

const TREND_HEADER: [&str; 6] = [
    "Month",
    "New Patterns",
    "Total Occurrences",
    "Critical Issues",
    "Resolution Rate",
    "Trend",
];

/// "83.3%", or "0%" when there was nothing to measure.
fn rate_text(rate: Option<f64>) -> Cell {
    match rate {
        Some(r) => Cell::text(format!("{:.1}%", r)),
        None => Cell::text("0%"),
    }
}

fn or_unknown(value: Option<usize>) -> Cell {
    value.map(Cell::count).unwrap_or_else(|| Cell::text(UNKNOWN))
}

fn summary_table(s: &ExecutiveSummary) -> ReportTable {
    let pct = if s.total_tickets > 0 {
        Some(s.recurring_pct)
    } else {
        None
    };

    let mut t = ReportTable::new();
    t.header(&["Metric", "Value"]);
    t.data(vec!["Total Tickets Analyzed".into(), s.total_tickets.into()]);
    t.data(vec!["Recurring Issue Patterns Found".into(), s.patterns.into()]);
    t.data(vec!["Tickets in Recurring Patterns".into(), s.tickets_in_patterns.into()]);
    t.data(vec!["Recurring Issues Percentage".into(), rate_text(pct)]);
    t.data(vec!["High Impact Issues (5+ occurrences)".into(), s.high_impact.into()]);
    t.data(vec!["Critical Issues (10+ occurrences)".into(), s.critical.into()]);
    t
}

fn top_issues_table(top: &[ClusterMetrics], pattern_len: usize) -> ReportTable {
    if top.is_empty() {
        return ReportTable::notice_only(
            "No recurring patterns found with current similarity threshold",
        );
    }

    let date = |d: Option<chrono::NaiveDate>| {
        d.map(|d| Cell::text(d.format("%Y-%m-%d").to_string()))
            .unwrap_or_else(|| Cell::text(UNKNOWN))
    };

    let mut t = ReportTable::new();
    t.header(&TOP_HEADER);
    for (rank, m) in top.iter().enumerate() {
        t.data(vec![
            Cell::count(rank + 1),
            Cell::text(display_pattern(&m.pattern, pattern_len)),
            Cell::count(m.occurrences),
            or_unknown(m.programs),
            or_unknown(m.engineers),
            m.resolution_rate
                .map(Cell::Percent)
                .unwrap_or_else(|| Cell::text(UNKNOWN)),
            Cell::Float(m.avg_reopens),
            date(m.first_seen),
            date(m.last_seen),
            Cell::text(m.impact_level.label()),
            Cell::text(m.action.label()),
        ]);
    }
    t
}

fn category_table(stats: Option<Vec<CategoryStat>>) -> ReportTable {
    let Some(stats) = stats else {
        return ReportTable::notice_only("Ticket Sub Category information not available");
    };

    let mut t = ReportTable::new();
    t.header(&CATEGORY_HEADER);
    for s in stats {
        t.data(vec![
            Cell::Text(s.category),
            Cell::count(s.patterns),
            Cell::count(s.tickets),
            Cell::Float(s.avg_per_pattern),
        ]);
    }
    t
}

fn engineer_table(stats: Option<Vec<EngineerStat>>) -> ReportTable {
    let Some(stats) = stats else {
        return ReportTable::notice_only("Engineer data not available");
    };

    let mut t = ReportTable::new();
    t.header(&ENGINEER_HEADER);
    for s in stats {
        t.data(vec![
            Cell::Text(s.engineer),
            Cell::count(s.issues_handled),
            Cell::count(s.unique_patterns),
            rate_text(s.resolution_rate),
            Cell::Float(s.avg_reopens),
            Cell::Float(s.score),
            Cell::text(s.focus.label()),
        ]);
    }
    t
}

fn trend_table(periods: Option<Vec<TrendPeriod>>) -> ReportTable {
    let Some(periods) = periods else {
        return ReportTable::notice_only("Date information not available for trend analysis");
    };

    let mut t = ReportTable::new();
    t.header(&TREND_HEADER);
    for p in periods {
        t.data(vec![
            Cell::Text(p.month),
            Cell::count(p.patterns),
            Cell::count(p.occurrences),
            Cell::count(p.critical),
            rate_text(p.resolution_rate),
            Cell::text(p.trend.label()),
        ]);
    }
    t
}

pub fn build(ctx: &MisContext<'_>) -> Result<ReportOutput, ReportIssue> {
    let config = ctx.config;
    let issues = discover(&ctx.batch, config)?;

    let trend = if issues.clusters.is_empty() {
        None
    } else {
        issues.monthly_trend(ctx.today, config.trend_months)
    };

    let sections = [
        ("RECURRING ISSUES EXECUTIVE SUMMARY", summary_table(&issues.summary())),
        (
            "TOP RECURRING ISSUES ANALYSIS",
            top_issues_table(&issues.top_issues(config), config.pattern_display_len),
        ),
        (
            "TICKET SUB CATEGORY-WISE RECURRING ISSUES BREAKDOWN",
            category_table(category_breakdown(&issues)),
        ),
        (
            "ENGINEER PERFORMANCE ON RECURRING ISSUES",
            engineer_table(engineer_performance(&issues)),
        ),
        ("RECURRING ISSUES MONTHLY TREND ANALYSIS", trend_table(trend)),
    ];

    let last = sections.len() - 1;
    let mut report = ReportTable::new();
    for (i, (title, table)) in sections.into_iter().enumerate() {
        report.title(title);
        report.blank();
        report.append(table);
        if i < last {
            report.blank();
            report.blank();
        }
    }

    Ok(ReportOutput::SingleTable {
        sheet: ReportKind::RecurringIssues.sheet_name(),
        table: report,
        highlight: false,
    })
}
