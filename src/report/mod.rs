pub mod aggregation;
pub mod issue;
pub mod pivot;
pub mod table;

pub use aggregation::{aggregate, AggregationRow, SlaAggregation, SlaLabels, SlaTable};
pub use issue::ReportIssue;
pub use pivot::{pivot, PivotSpec};
pub use table::{Cell, KeyedEntry, NamedTable, ReportOutput, ReportTable, Row, RowKind};
