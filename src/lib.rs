pub mod analytics;
pub mod analyzer;
pub mod clock;
pub mod config;
pub mod error;
pub mod export;
pub mod mis;
pub mod nlp;
pub mod parser;
pub mod report;

pub use error::AppError;
pub use mis::{generate, ReportKind};
pub use report::{ReportOutput, ReportTable};

// ─── E2E Integration Tests ──────────────────────────────────────────────────
