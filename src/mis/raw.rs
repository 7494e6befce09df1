// Raw projections: selected source columns echoed as read, with renames

use crate::parser::types::Dataset;
use crate::report::table::{Cell, ReportTable};

/// One output column and where to read it from. `fallback` is used only
/// when `source` is absent from the upload.
#[derive(Debug, Clone, Copy)]
pub struct RawColumn {
    pub header: &'static str,
    pub source: &'static str,
    pub fallback: Option<&'static str>,
}

impl RawColumn {
    pub const fn named(header: &'static str) -> Self {
        RawColumn {
            header,
            source: header,
            fallback: None,
        }
    }

    pub const fn renamed(
        header: &'static str,
        source: &'static str,
        fallback: Option<&'static str>,
    ) -> Self {
        RawColumn {
            header,
            source,
            fallback,
        }
    }

    fn resolve(&self, dataset: &Dataset) -> Option<usize> {
        let columns = dataset.columns();
        columns
            .index(self.source)
            .or_else(|| self.fallback.and_then(|f| columns.index(f)))
    }
}

/// Header plus one data row per dataset row in `rows`. Columns absent from
/// the upload are left out. `extra` appends computed cells under
/// `extra_headers`.
pub fn project(
    dataset: &Dataset,
    rows: &[usize],
    columns: &[RawColumn],
    extra_headers: &[&str],
    extra: impl Fn(usize) -> Vec<Cell>,
) -> ReportTable {
    let present: Vec<(&RawColumn, usize)> = columns
        .iter()
        .filter_map(|c| c.resolve(dataset).map(|i| (c, i)))
        .collect();

    let mut header: Vec<&str> = present.iter().map(|(c, _)| c.header).collect();
    header.extend_from_slice(extra_headers);

    let mut table = ReportTable::new();
    table.header(&header);

    for &row in rows {
        let mut cells: Vec<Cell> = present
            .iter()
            .map(|(_, i)| Cell::opt(dataset.value_at(row, *i)))
            .collect();
        cells.extend(extra(row));
        table.data(cells);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[RawColumn] = &[
        RawColumn::named("Ticket Id"),
        RawColumn::renamed("Created Time (Ticket)", "Created Time (Ticket)", Some("Created Tim")),
        RawColumn::named("Email (Contact)"),
        RawColumn::renamed("Client Name", "Program Name", None),
    ];

    fn texts(table: &ReportTable, row: usize) -> Vec<String> {
        table.rows[row].cells.iter().map(Cell::display).collect()
    }

    #[test]
    fn test_project_renames_and_skips_absent() {
        let ds = Dataset::from_rows(
            &["Program Name", "Ticket Id", "Created Tim"],
            &[vec!["Acme", "1", "2026-10-01"], vec!["Globex", "2", ""]],
        );
        let table = project(&ds, &[1, 0], COLUMNS, &[], |_| Vec::new());
        assert_eq!(
            texts(&table, 0),
            vec!["Ticket Id", "Created Time (Ticket)", "Client Name"]
        );
        assert_eq!(texts(&table, 1), vec!["2", "", "Globex"]);
        assert_eq!(texts(&table, 2), vec!["1", "2026-10-01", "Acme"]);
    }

    #[test]
    fn test_source_preferred_over_fallback() {
        let ds = Dataset::from_rows(
            &["Created Tim", "Created Time (Ticket)"],
            &[vec!["short", "full"]],
        );
        let table = project(&ds, &[0], COLUMNS, &[], |_| Vec::new());
        assert_eq!(texts(&table, 1), vec!["full"]);
    }

    #[test]
    fn test_extra_columns() {
        let ds = Dataset::from_rows(&["Ticket Id"], &[vec!["9"]]);
        let table = project(&ds, &[0], COLUMNS, &["Row"], |r| vec![Cell::count(r)]);
        assert_eq!(texts(&table, 0), vec!["Ticket Id", "Row"]);
        assert_eq!(texts(&table, 1), vec!["9", "0"]);
    }
}
