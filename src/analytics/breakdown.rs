// Segmentations of the recurring clusters: by sub-category and by engineer

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

use crate::analytics::recurring::RecurringIssues;
use crate::analyzer::stats::{mean, pct1, round1};
use crate::analyzer::status::is_closed;

// ─────────────────────────────────────────────
// Sub-category
// ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category: String,
    /// Clusters holding at least one ticket of the category.
    pub patterns: usize,
    /// Clustered tickets of the category.
    pub tickets: usize,
    pub avg_per_pattern: f64,
}

/// Sub-categories touched by clustered tickets, most tickets first.
/// `None` without clusters or without a sub-category column.
pub fn category_breakdown(issues: &RecurringIssues<'_>) -> Option<Vec<CategoryStat>> {
    if issues.clusters.is_empty() || !issues.columns.sub_category {
        return None;
    }

    // insertion order is first appearance, kept as the tie-break
    let mut stats: Vec<CategoryStat> = Vec::new();

    for cluster in &issues.clusters {
        let members = issues.members(cluster);
        let mut seen: Vec<&str> = Vec::new();
        for category in members.iter().filter_map(|t| t.sub_category.as_deref()) {
            if !seen.contains(&category) {
                seen.push(category);
            }
        }

        for category in seen {
            let count = members
                .iter()
                .filter(|t| t.sub_category.as_deref() == Some(category))
                .count();
            match stats.iter_mut().find(|s| s.category == category) {
                Some(stat) => {
                    stat.patterns += 1;
                    stat.tickets += count;
                }
                None => stats.push(CategoryStat {
                    category: category.to_string(),
                    patterns: 1,
                    tickets: count,
                    avg_per_pattern: 0.0,
                }),
            }
        }
    }

    for stat in &mut stats {
        stat.avg_per_pattern = round1(stat.tickets as f64 / stat.patterns as f64);
    }
    stats.sort_by(|a, b| b.tickets.cmp(&a.tickets));

    Some(stats)
}

// ─────────────────────────────────────────────
// Engineer
// ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FocusArea {
    ResolutionEfficiency,
    QualityImprovement,
    KnowledgeExpansion,
    MentoringOthers,
}

impl FocusArea {
    pub fn choose(resolution_rate: f64, avg_reopens: f64, unique_patterns: usize) -> Self {
        if resolution_rate < 70.0 {
            FocusArea::ResolutionEfficiency
        } else if avg_reopens > 1.5 {
            FocusArea::QualityImprovement
        } else if unique_patterns < 3 {
            FocusArea::KnowledgeExpansion
        } else {
            FocusArea::MentoringOthers
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FocusArea::ResolutionEfficiency => "Resolution Efficiency",
            FocusArea::QualityImprovement => "Quality Improvement",
            FocusArea::KnowledgeExpansion => "Knowledge Expansion",
            FocusArea::MentoringOthers => "Mentoring Others",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineerStat {
    pub engineer: String,
    pub issues_handled: usize,
    pub unique_patterns: usize,
    /// One decimal; `None` without a status column.
    pub resolution_rate: Option<f64>,
    pub avg_reopens: f64,
    pub score: f64,
    pub focus: FocusArea,
}

/// Weighted score: resolution 40%, low reopens 30%, breadth 30%.
/// Stays within [0, 100]; breadth is capped so the maximum is 85.
pub fn performance_score(resolution_rate: f64, avg_reopens: f64, unique_patterns: usize) -> f64 {
    let reopen_part = 100.0 - (avg_reopens * 10.0).min(100.0);
    let breadth_part = (unique_patterns as f64 * 5.0).min(50.0);
    round1(resolution_rate * 0.4 + reopen_part * 0.3 + breadth_part * 0.3)
}

/// One row per engineer owning a clustered ticket, best score first.
/// `None` without clusters or without an engineer column.
pub fn engineer_performance(issues: &RecurringIssues<'_>) -> Option<Vec<EngineerStat>> {
    if issues.clusters.is_empty() || !issues.columns.engineer {
        return None;
    }

    let clustered: BTreeSet<usize> = issues
        .clusters
        .iter()
        .flat_map(|c| c.members.iter().copied())
        .collect();

    let mut engineers: Vec<&str> = Vec::new();
    for &i in &clustered {
        if let Some(name) = issues.tickets[i].engineer.as_deref() {
            if !engineers.contains(&name) {
                engineers.push(name);
            }
        }
    }

    let mut stats: Vec<EngineerStat> = engineers
        .into_iter()
        .map(|engineer| {
            let handled: Vec<usize> = clustered
                .iter()
                .copied()
                .filter(|&i| issues.tickets[i].engineer.as_deref() == Some(engineer))
                .collect();

            let patterns: HashSet<&str> = issues
                .clusters
                .iter()
                .filter(|c| {
                    c.members
                        .iter()
                        .any(|&i| issues.tickets[i].engineer.as_deref() == Some(engineer))
                })
                .map(|c| c.pattern.as_str())
                .collect();

            let resolution_rate = issues.columns.status.then(|| {
                let resolved = handled.iter().filter(|&&i| is_closed(&issues.tickets[i])).count();
                pct1(resolved, handled.len())
            });
            let reopens: Vec<f64> = handled.iter().map(|&i| issues.tickets[i].reopens()).collect();
            let avg_reopens = round1(mean(&reopens));

            let rate = resolution_rate.unwrap_or(0.0);
            EngineerStat {
                engineer: engineer.to_string(),
                issues_handled: handled.len(),
                unique_patterns: patterns.len(),
                resolution_rate,
                avg_reopens,
                score: performance_score(rate, avg_reopens, patterns.len()),
                focus: FocusArea::choose(rate, avg_reopens, patterns.len()),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.score.total_cmp(&a.score));
    Some(stats)
}
