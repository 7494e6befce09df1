pub mod breakdown;
pub mod clustering;
pub mod recurring;

pub use breakdown::{category_breakdown, engineer_performance, CategoryStat, EngineerStat, FocusArea};
pub use clustering::{cluster_texts, IssueCluster};
pub use recurring::{discover, ClusterMetrics, ExecutiveSummary, RecurringIssues, TrendPeriod};
