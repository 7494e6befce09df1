use chrono::NaiveDate;
use serde::Serialize;

/// One report cell. Numbers stay typed until serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    /// Displayed with one decimal.
    Float(f64),
    /// Whole percentage, displayed "N%".
    Percent(u32),
    Date(NaiveDate),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn count(n: usize) -> Self {
        Cell::Int(n as i64)
    }

    /// Text value or an empty cell for absent fields.
    pub fn opt(s: Option<&str>) -> Self {
        s.map(Cell::text).unwrap_or(Cell::Empty)
    }

    pub fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Int(n) => n.to_string(),
            Cell::Float(f) => format!("{:.1}", f),
            Cell::Percent(p) => format!("{}%", p),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<usize> for Cell {
    fn from(n: usize) -> Self {
        Cell::count(n)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RowKind {
    Title,
    Header,
    Data,
    Total,
    Blank,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub kind: RowKind,
    pub cells: Vec<Cell>,
}

/// Ordered typed rows. Most reports are titled sub-tables stacked with
/// blank rows between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportTable {
    pub rows: Vec<Row>,
}

impl ReportTable {
    pub fn new() -> Self {
        ReportTable::default()
    }

    /// Table made of a single notice row.
    pub fn notice_only(message: impl Into<String>) -> Self {
        let mut t = ReportTable::new();
        t.notice(message);
        t
    }

    pub fn push(&mut self, kind: RowKind, cells: Vec<Cell>) -> &mut Self {
        self.rows.push(Row { kind, cells });
        self
    }

    pub fn title(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(RowKind::Title, vec![Cell::Text(text.into())])
    }

    pub fn header<S: AsRef<str>>(&mut self, labels: &[S]) -> &mut Self {
        let cells = labels.iter().map(|l| Cell::text(l.as_ref())).collect();
        self.push(RowKind::Header, cells)
    }

    pub fn data(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.push(RowKind::Data, cells)
    }

    pub fn total(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.push(RowKind::Total, cells)
    }

    pub fn blank(&mut self) -> &mut Self {
        self.push(RowKind::Blank, Vec::new())
    }

    pub fn notice(&mut self, message: impl Into<String>) -> &mut Self {
        self.push(RowKind::Notice, vec![Cell::Text(message.into())])
    }

    pub fn append(&mut self, other: ReportTable) -> &mut Self {
        self.rows.extend(other.rows);
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest row, in cells.
    pub fn width(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    pub fn rows_of(&self, kind: RowKind) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter(move |r| r.kind == kind)
    }

    /// True when the table is a lone notice (error or empty result).
    pub fn is_notice(&self) -> bool {
        self.rows.len() == 1 && self.rows[0].kind == RowKind::Notice
    }

    /// Indices of rows to paint red: any row with a text cell containing
    /// "Crossed SLA" (SLA header rows included), or a nonzero percentage
    /// under the nearest preceding header cell containing "Crossed SLA%".
    pub fn highlighted_rows(&self) -> Vec<usize> {
        let mut crossed_cols: Vec<usize> = Vec::new();
        let mut marked = Vec::new();

        for (i, row) in self.rows.iter().enumerate() {
            if row.kind == RowKind::Header {
                crossed_cols = row
                    .cells
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.display().contains("Crossed SLA%"))
                    .map(|(col, _)| col)
                    .collect();
            }

            let nonzero_crossed = row.kind != RowKind::Header
                && crossed_cols
                    .iter()
                    .any(|&col| matches!(row.cells.get(col), Some(Cell::Percent(p)) if *p > 0));
            let mentions_crossed = row
                .cells
                .iter()
                .any(|c| matches!(c, Cell::Text(s) if s.contains("Crossed SLA")));

            if nonzero_crossed || mentions_crossed {
                marked.push(i);
            }
        }

        marked
    }
}

/// A table bound to a sheet or file name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedTable {
    pub name: String,
    pub table: ReportTable,
}

impl NamedTable {
    pub fn new(name: impl Into<String>, table: ReportTable) -> Self {
        NamedTable {
            name: name.into(),
            table,
        }
    }
}

/// Tables produced for one key of a keyed report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyedEntry {
    pub key: String,
    pub tables: Vec<NamedTable>,
}

/// Result of one report run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ReportOutput {
    SingleTable {
        sheet: String,
        table: ReportTable,
        highlight: bool,
    },
    RawPlusSummary {
        raw: NamedTable,
        summary: NamedTable,
    },
    KeyedBundle {
        entries: Vec<KeyedEntry>,
    },
}

impl ReportOutput {
    /// The single table, if this output has that shape.
    pub fn single_table(&self) -> Option<&ReportTable> {
        match self {
            ReportOutput::SingleTable { table, .. } => Some(table),
            _ => None,
        }
    }
}
