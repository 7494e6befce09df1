// Recurring issue discovery: normalization, clustering and per-pattern metrics

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::analytics::clustering::{cluster_texts, IssueCluster};
use crate::analyzer::stats::{mean, round1, whole_pct};
use crate::analyzer::status::is_closed;
use crate::analyzer::temporal::trailing_months;
use crate::config::AnalysisConfig;
use crate::nlp::normalize::{combined_text, normalize_text};
use crate::parser::schema::TicketBatch;
use crate::parser::types::TicketRecord;
use crate::report::issue::ReportIssue;

pub const MISSING_TEXT_COLUMN: &str = "Resolution/Subject column not found. Expected: Resolution, Solution, Fix, Root Cause, Closure Comments, or Subject";

/// Clusters of at least this many tickets count as critical in the trend.
const TREND_CRITICAL_SIZE: usize = 5;

// ─────────────────────────────────────────────
// Public types
// ─────────────────────────────────────────────

/// Optional columns the metrics depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AvailableColumns {
    pub status: bool,
    pub program: bool,
    pub engineer: bool,
    pub created: bool,
    pub sub_category: bool,
}

/// Clusters discovered over one batch.
#[derive(Debug, Clone)]
pub struct RecurringIssues<'a> {
    pub tickets: &'a [TicketRecord],
    pub columns: AvailableColumns,
    pub clusters: Vec<IssueCluster>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImpactLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl ImpactLevel {
    pub fn from_occurrences(occurrences: usize) -> Self {
        match occurrences {
            n if n >= 10 => ImpactLevel::Critical,
            n if n >= 5 => ImpactLevel::High,
            n if n >= 3 => ImpactLevel::Medium,
            _ => ImpactLevel::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ImpactLevel::Critical => "Critical",
            ImpactLevel::High => "High",
            ImpactLevel::Medium => "Medium",
            ImpactLevel::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendedAction {
    RootCauseReview,
    SystemWideInvestigation,
    TechnicalFix,
    InfrastructureReview,
    ProcessImprovement,
}

impl RecommendedAction {
    /// First matching rule wins: repeated reopens, spread over many
    /// programs, error wording, connectivity wording.
    pub fn choose(avg_reopens: f64, programs: Option<usize>, pattern: &str) -> Self {
        let pattern = pattern.to_lowercase();
        if avg_reopens > 1.0 {
            RecommendedAction::RootCauseReview
        } else if programs.is_some_and(|p| p > 3) {
            RecommendedAction::SystemWideInvestigation
        } else if pattern.contains("error") || pattern.contains("failed") {
            RecommendedAction::TechnicalFix
        } else if pattern.contains("timeout") || pattern.contains("connection") {
            RecommendedAction::InfrastructureReview
        } else {
            RecommendedAction::ProcessImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RecommendedAction::RootCauseReview => "Root Cause Analysis & Process Review",
            RecommendedAction::SystemWideInvestigation => "System-wide Investigation",
            RecommendedAction::TechnicalFix => "Technical Fix Required",
            RecommendedAction::InfrastructureReview => "Infrastructure Review",
            RecommendedAction::ProcessImprovement => "Process Improvement",
        }
    }
}

/// Derived metrics of one cluster. `None` renders as "Unknown".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMetrics {
    pub pattern: String,
    pub occurrences: usize,
    pub programs: Option<usize>,
    pub engineers: Option<usize>,
    pub resolution_rate: Option<u32>,
    pub avg_reopens: f64,
    pub first_seen: Option<NaiveDate>,
    pub last_seen: Option<NaiveDate>,
    pub impact_score: f64,
    pub impact_level: ImpactLevel,
    pub action: RecommendedAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub total_tickets: usize,
    pub patterns: usize,
    pub tickets_in_patterns: usize,
    /// One decimal; 0 when there are no tickets.
    pub recurring_pct: f64,
    pub high_impact: usize,
    pub critical: usize,
}

/// Trend direction of a period against the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    Baseline,
    Increasing,
    Decreasing,
    Stable,
}

impl Trend {
    fn between(previous: usize, current: usize) -> Self {
        let (previous, current) = (previous as f64, current as f64);
        if current > previous * 1.1 {
            Trend::Increasing
        } else if current < previous * 0.9 {
            Trend::Decreasing
        } else {
            Trend::Stable
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Trend::Baseline => "Baseline",
            Trend::Increasing => "Increasing",
            Trend::Decreasing => "Decreasing",
            Trend::Stable => "Stable",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPeriod {
    /// "YYYY-MM"
    pub month: String,
    pub patterns: usize,
    pub occurrences: usize,
    pub critical: usize,
    /// One decimal; `None` when no ticket status could be read for the period.
    pub resolution_rate: Option<f64>,
    pub trend: Trend,
}

// ─────────────────────────────────────────────
// Discovery
// ─────────────────────────────────────────────

/// Normalize every ticket and cluster them. Fails only when no free-text
/// column exists at all.
pub fn discover<'a>(
    batch: &'a TicketBatch,
    config: &AnalysisConfig,
) -> Result<RecurringIssues<'a>, ReportIssue> {
    let schema = &batch.schema;
    if schema.resolution.is_none() {
        return Err(ReportIssue::MissingColumn(MISSING_TEXT_COLUMN.to_string()));
    }

    let columns = AvailableColumns {
        status: schema.status.is_some(),
        program: schema.program.is_some(),
        engineer: schema.engineer.is_some(),
        created: schema.created.is_some(),
        sub_category: schema.sub_category.is_some(),
    };

    let texts: Vec<String> = batch
        .records
        .iter()
        .map(|t| normalize_text(&combined_text(t), config.max_normalized_len))
        .collect();
    let clusters = cluster_texts(&texts, config);

    log::info!(
        "Recurring issues: {} tickets, {} patterns",
        batch.records.len(),
        clusters.len()
    );

    Ok(RecurringIssues {
        tickets: &batch.records,
        columns,
        clusters,
    })
}

// ─────────────────────────────────────────────
// Metrics
// ─────────────────────────────────────────────

fn distinct<'t>(values: impl Iterator<Item = Option<&'t str>>) -> usize {
    values.flatten().collect::<HashSet<_>>().len()
}

impl<'a> RecurringIssues<'a> {
    pub fn members(&self, cluster: &IssueCluster) -> Vec<&'a TicketRecord> {
        cluster.members.iter().map(|&i| &self.tickets[i]).collect()
    }

    /// Occurrences plus twice the summed reopen count.
    pub fn impact_score(&self, cluster: &IssueCluster) -> f64 {
        let reopens: f64 = self.members(cluster).iter().map(|t| t.reopens()).sum();
        cluster.size() as f64 + 2.0 * reopens
    }

    pub fn metrics(&self, cluster: &IssueCluster) -> ClusterMetrics {
        let members = self.members(cluster);
        let occurrences = members.len();

        let programs = self
            .columns
            .program
            .then(|| distinct(members.iter().map(|t| t.program.as_deref())));
        let engineers = self
            .columns
            .engineer
            .then(|| distinct(members.iter().map(|t| t.engineer.as_deref())));
        let resolution_rate = self.columns.status.then(|| {
            let closed = members.iter().filter(|t| is_closed(t)).count();
            whole_pct(closed, occurrences)
        });

        let reopens: Vec<f64> = members.iter().map(|t| t.reopens()).collect();
        let avg_reopens = round1(mean(&reopens));

        let dates = members.iter().filter_map(|t| t.created.map(|c| c.date()));
        let first_seen = dates.clone().min();
        let last_seen = dates.max();

        ClusterMetrics {
            pattern: cluster.pattern.clone(),
            occurrences,
            programs,
            engineers,
            resolution_rate,
            avg_reopens,
            first_seen,
            last_seen,
            impact_score: self.impact_score(cluster),
            impact_level: ImpactLevel::from_occurrences(occurrences),
            action: RecommendedAction::choose(avg_reopens, programs, &cluster.pattern),
        }
    }

    /// Top `config.top_clusters` clusters by impact score, highest first.
    pub fn top_issues(&self, config: &AnalysisConfig) -> Vec<ClusterMetrics> {
        let mut ranked: Vec<(f64, &IssueCluster)> = self
            .clusters
            .iter()
            .map(|c| (self.impact_score(c), c))
            .collect();
        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

        ranked
            .into_iter()
            .take(config.top_clusters)
            .map(|(_, c)| self.metrics(c))
            .collect()
    }

    pub fn summary(&self) -> ExecutiveSummary {
        let total_tickets = self.tickets.len();
        let tickets_in_patterns: usize = self.clusters.iter().map(IssueCluster::size).sum();
        let recurring_pct = if total_tickets > 0 {
            round1(tickets_in_patterns as f64 / total_tickets as f64 * 100.0)
        } else {
            0.0
        };

        ExecutiveSummary {
            total_tickets,
            patterns: self.clusters.len(),
            tickets_in_patterns,
            recurring_pct,
            high_impact: self.clusters.iter().filter(|c| c.size() >= 5).count(),
            critical: self.clusters.iter().filter(|c| c.size() >= 10).count(),
        }
    }

    /// Per-month activity of the clusters over the `months` complete months
    /// before `today`'s month, oldest first. `None` when no creation-time
    /// column exists.
    pub fn monthly_trend(&self, today: NaiveDate, months: u32) -> Option<Vec<TrendPeriod>> {
        if !self.columns.created {
            return None;
        }

        let mut periods: Vec<TrendPeriod> = Vec::new();
        for window in trailing_months(today, months) {
            let mut patterns = 0;
            let mut occurrences = 0;
            let mut critical = 0;
            let mut resolved = 0;
            let mut judged = 0;

            for cluster in &self.clusters {
                let in_period: Vec<&TicketRecord> = self
                    .members(cluster)
                    .into_iter()
                    .filter(|t| t.created.is_some_and(|c| window.contains(c.date())))
                    .collect();
                if in_period.is_empty() {
                    continue;
                }

                patterns += 1;
                occurrences += in_period.len();
                if cluster.size() >= TREND_CRITICAL_SIZE {
                    critical += 1;
                }
                if self.columns.status {
                    resolved += in_period.iter().filter(|t| is_closed(t)).count();
                    judged += in_period.len();
                }
            }

            let trend = match periods.last() {
                None => Trend::Baseline,
                Some(prev) => Trend::between(prev.occurrences, occurrences),
            };
            let resolution_rate =
                (judged > 0).then(|| round1(resolved as f64 / judged as f64 * 100.0));

            periods.push(TrendPeriod {
                month: window.key,
                patterns,
                occurrences,
                critical,
                resolution_rate,
                trend,
            });
        }

        Some(periods)
    }
}

/// Pattern text cut to `max_chars` characters, with "..." when cut.
pub fn display_pattern(pattern: &str, max_chars: usize) -> String {
    if pattern.chars().count() > max_chars {
        let cut: String = pattern.chars().take(max_chars).collect();
        format!("{}...", cut)
    } else {
        pattern.to_string()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
