use std::collections::BTreeMap;
use std::fmt::Display;

use crate::report::aggregation::GRAND_TOTAL;
use crate::report::table::{Cell, ReportTable};

/// Layout of a count pivot.
#[derive(Debug, Clone, Copy)]
pub struct PivotSpec {
    /// First header cell, naming the row dimension.
    pub row_label: &'static str,
    /// Header of the trailing per-row total column.
    pub total_label: &'static str,
    pub grand_total_row: bool,
}

/// Count `(row, column)` pairs into a table: rows and columns in key
/// order, only columns that hold at least one item, a per-row total
/// column, and optionally a summed Grand Total row.
pub fn pivot<R, C>(items: impl IntoIterator<Item = (R, C)>, spec: &PivotSpec) -> ReportTable
where
    R: Ord + Display,
    C: Ord + Clone + Display,
{
    let mut counts: BTreeMap<R, BTreeMap<C, usize>> = BTreeMap::new();
    let mut column_totals: BTreeMap<C, usize> = BTreeMap::new();

    for (row, col) in items {
        *counts.entry(row).or_default().entry(col.clone()).or_insert(0) += 1;
        *column_totals.entry(col).or_insert(0) += 1;
    }

    let columns: Vec<&C> = column_totals
        .iter()
        .filter(|(_, n)| **n > 0)
        .map(|(c, _)| c)
        .collect();

    let mut header = vec![spec.row_label.to_string()];
    header.extend(columns.iter().map(|c| c.to_string()));
    header.push(spec.total_label.to_string());

    let mut table = ReportTable::new();
    table.header(&header);

    for (row, row_counts) in &counts {
        let mut cells = vec![Cell::text(row.to_string())];
        cells.extend(
            columns
                .iter()
                .map(|c| Cell::count(row_counts.get(*c).copied().unwrap_or(0))),
        );
        cells.push(Cell::count(row_counts.values().sum()));
        table.data(cells);
    }

    if spec.grand_total_row {
        let mut cells = vec![Cell::text(GRAND_TOTAL)];
        cells.extend(columns.iter().map(|c| Cell::count(column_totals[*c])));
        cells.push(Cell::count(column_totals.values().sum()));
        table.total(cells);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::table::RowKind;

    const SPEC: PivotSpec = PivotSpec {
        row_label: "Select Engineer",
        total_label: "Grand Total",
        grand_total_row: true,
    };

    fn texts(cells: &[Cell]) -> Vec<String> {
        cells.iter().map(Cell::display).collect()
    }

    #[test]
    fn test_pivot_by_days() {
        let items = vec![("Ravi", 3i64), ("Asha", 10), ("Ravi", 3), ("Asha", 0)];
        let table = pivot(items, &SPEC);
        assert_eq!(
            texts(&table.rows[0].cells),
            vec!["Select Engineer", "0", "3", "10", "Grand Total"]
        );
        assert_eq!(texts(&table.rows[1].cells), vec!["Asha", "1", "0", "1", "2"]);
        assert_eq!(texts(&table.rows[2].cells), vec!["Ravi", "0", "2", "0", "2"]);
        assert_eq!(table.rows[3].kind, RowKind::Total);
        assert_eq!(texts(&table.rows[3].cells), vec!["Grand Total", "1", "2", "1", "4"]);
    }

    #[test]
    fn test_pivot_without_total_row() {
        let spec = PivotSpec {
            row_label: "Select Engineer",
            total_label: "Total",
            grand_total_row: false,
        };
        let items = vec![("Ravi".to_string(), "High".to_string()), ("Ravi".to_string(), "Low".to_string())];
        let table = pivot(items, &spec);
        assert_eq!(table.len(), 2);
        assert_eq!(texts(&table.rows[1].cells), vec!["Ravi", "1", "1", "2"]);
    }

    #[test]
    fn test_pivot_empty() {
        let table = pivot(Vec::<(String, i64)>::new(), &SPEC);
        assert_eq!(texts(&table.rows[0].cells), vec!["Select Engineer", "Grand Total"]);
        assert_eq!(texts(&table.rows[1].cells), vec!["Grand Total", "0"]);
    }
}
