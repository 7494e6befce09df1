// Greedy single-pass clustering of normalized ticket texts

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::nlp::similarity::{similarity, PreparedText};

// ─────────────────────────────────────────────
// Public types
// ─────────────────────────────────────────────

/// A group of tickets sharing one recurring problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueCluster {
    /// Normalized text of the seed ticket.
    pub pattern: String,
    /// Indices into the clustered text slice; seed first, then in
    /// absorption order. Always at least two.
    pub members: Vec<usize>,
}

impl IssueCluster {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

// ─────────────────────────────────────────────
// Clustering
// ─────────────────────────────────────────────

/// Visit order: longest text first, ties in input order.
fn visit_order(texts: &[String]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..texts.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(texts[i].chars().count()));
    order
}

/// Group texts by similarity to a seed.
///
/// Each unassigned text, in visit order, seeds a cluster and absorbs every
/// later unassigned text whose similarity to the seed reaches the seed's
/// threshold (stricter for short seeds). Singletons are discarded. The
/// result depends only on the input texts and `config`.
pub fn cluster_texts(texts: &[String], config: &AnalysisConfig) -> Vec<IssueCluster> {
    let prepared: Vec<PreparedText> = texts.iter().map(|t| PreparedText::new(t)).collect();
    let order = visit_order(texts);
    let mut assigned = vec![false; texts.len()];
    let mut clusters = Vec::new();

    for &seed in &order {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let threshold = config.threshold_for(prepared[seed].len());
        let mut members = vec![seed];

        for &candidate in &order {
            if assigned[candidate] {
                continue;
            }
            if similarity(&prepared[seed], &prepared[candidate]) >= threshold {
                assigned[candidate] = true;
                members.push(candidate);
            }
        }

        if members.len() >= 2 {
            clusters.push(IssueCluster {
                pattern: texts[seed].clone(),
                members,
            });
        }
    }

    log::debug!(
        "Clustering: {} texts → {} clusters",
        texts.len(),
        clusters.len()
    );
    clusters
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
