pub mod classifier;
pub mod stats;
pub mod status;
pub mod temporal;

pub use classifier::{SlaBasis, SlaClassifier, SlaStatus};
