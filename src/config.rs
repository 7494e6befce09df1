use std::path::Path;

use serde::Serialize;

use crate::error::AppError;

/// Tunable heuristics of the recurring-issue engine.
/// Loaded key by key through `config_from_json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisConfig {
    /// Similarity needed to join a cluster seeded by a long text.
    pub similarity_threshold: f64,
    /// Similarity needed when the seed text is short.
    pub short_text_threshold: f64,
    /// Seed texts strictly shorter than this use `short_text_threshold`.
    pub short_text_len: usize,
    pub max_normalized_len: usize,
    pub pattern_display_len: usize,
    pub top_clusters: usize,
    pub trend_months: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            similarity_threshold: 0.65,
            short_text_threshold: 0.75,
            short_text_len: 50,
            max_normalized_len: 200,
            pattern_display_len: 80,
            top_clusters: 25,
            trend_months: 6,
        }
    }
}

impl AnalysisConfig {
    /// Threshold applied against a seed of `seed_len` characters.
    pub fn threshold_for(&self, seed_len: usize) -> f64 {
        if seed_len < self.short_text_len {
            self.short_text_threshold
        } else {
            self.similarity_threshold
        }
    }
}

/// Load a JSON config file. Keys are read one by one; a missing or
/// ill-typed value keeps its default, an unknown key is ignored.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, AppError> {
    let text = std::fs::read_to_string(path)?;
    config_from_json(&text)
}

pub fn config_from_json(text: &str) -> Result<AnalysisConfig, AppError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let map = value
        .as_object()
        .ok_or_else(|| AppError::Config("top-level JSON object expected".to_string()))?;

    let mut config = AnalysisConfig::default();

    for (key, value) in map {
        match key.as_str() {
            "similarityThreshold" => {
                config.similarity_threshold = ratio(value).unwrap_or(config.similarity_threshold)
            }
            "shortTextThreshold" => {
                config.short_text_threshold =
                    ratio(value).unwrap_or(config.short_text_threshold)
            }
            "shortTextLen" => {
                config.short_text_len =
                    count(value).unwrap_or(config.short_text_len)
            }
            "maxNormalizedLen" => {
                config.max_normalized_len =
                    count(value).unwrap_or(config.max_normalized_len)
            }
            "patternDisplayLen" => {
                config.pattern_display_len =
                    count(value).unwrap_or(config.pattern_display_len)
            }
            "topClusters" => config.top_clusters = count(value).unwrap_or(config.top_clusters),
            "trendMonths" => {
                config.trend_months = count(value)
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(config.trend_months)
            }
            other => log::warn!("Unknown config key ignored: {}", other),
        }
    }

    Ok(config)
}

fn ratio(value: &serde_json::Value) -> Option<f64> {
    value.as_f64().filter(|v| (0.0..=1.0).contains(v))
}

fn count(value: &serde_json::Value) -> Option<usize> {
    value
        .as_u64()
        .filter(|v| *v > 0)
        .and_then(|v| usize::try_from(v).ok())
}
