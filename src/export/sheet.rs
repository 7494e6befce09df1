// Writes one ReportTable onto a worksheet, cell types preserved

use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Worksheet, XlsxError};

use crate::export::{
    create_date_format, create_header_format, create_integer_format, create_notice_format,
    create_number_format, create_percent_format, create_title_format, create_total_format,
    highlight,
};
use crate::report::table::{Cell, ReportTable, RowKind};

const MIN_WIDTH: usize = 10;
const MAX_WIDTH: usize = 50;

fn row_format(kind: RowKind) -> Format {
    match kind {
        RowKind::Title => create_title_format(),
        RowKind::Header => create_header_format(),
        RowKind::Total => create_total_format(),
        RowKind::Notice => create_notice_format(),
        RowKind::Data | RowKind::Blank => Format::new(),
    }
}

fn write_cell(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
    kind: RowKind,
    marked: bool,
) -> Result<(), XlsxError> {
    let paint = |f: Format| if marked { highlight(f) } else { f };
    let base = row_format(kind);

    match cell {
        Cell::Empty => {
            if marked {
                ws.write_blank(row, col, &paint(base))?;
            }
        }
        Cell::Text(s) => {
            ws.write_with_format(row, col, s.as_str(), &paint(base))?;
        }
        Cell::Int(n) => {
            let f = if kind == RowKind::Data { create_integer_format() } else { base };
            ws.write_with_format(row, col, *n as f64, &paint(f))?;
        }
        Cell::Float(x) => {
            ws.write_with_format(row, col, *x, &paint(create_number_format()))?;
        }
        Cell::Percent(p) => {
            let f = if kind == RowKind::Total {
                create_total_format().set_num_format("0%")
            } else {
                create_percent_format()
            };
            ws.write_with_format(row, col, f64::from(*p) / 100.0, &paint(f))?;
        }
        Cell::Date(d) => {
            let date = ExcelDateTime::from_ymd(d.year() as u16, d.month() as u8, d.day() as u8)?;
            ws.write_with_format(row, col, &date, &paint(create_date_format()))?;
        }
    }

    Ok(())
}

/// A lone header row followed only by data rows: a flat list that gets
/// a frozen header and an autofilter.
fn is_flat(table: &ReportTable) -> bool {
    matches!(table.rows.first(), Some(r) if r.kind == RowKind::Header)
        && table.rows[1..].iter().all(|r| r.kind == RowKind::Data)
}

/// Write `table` from A1. Rows listed by `highlighted_rows()` are painted
/// red when `highlight_rows` is set.
pub fn write_table(
    ws: &mut Worksheet,
    table: &ReportTable,
    highlight_rows: bool,
) -> Result<(), XlsxError> {
    let marked: Vec<usize> = if highlight_rows {
        table.highlighted_rows()
    } else {
        Vec::new()
    };

    let mut widths: Vec<usize> = vec![MIN_WIDTH; table.width()];

    for (r, row) in table.rows.iter().enumerate() {
        let is_marked = marked.contains(&r);
        for (c, cell) in row.cells.iter().enumerate() {
            write_cell(ws, r as u32, c as u16, cell, row.kind, is_marked)?;
            // titles and notices spill over; they do not size the column
            if matches!(row.kind, RowKind::Header | RowKind::Data | RowKind::Total) {
                let len = cell.display().chars().count() + 2;
                widths[c] = widths[c].max(len.min(MAX_WIDTH));
            }
        }
    }

    for (c, w) in widths.iter().enumerate() {
        ws.set_column_width(c as u16, *w as f64)?;
    }

    if is_flat(table) {
        ws.set_freeze_panes(1, 0)?;
        let last_col = table.width().saturating_sub(1) as u16;
        ws.autofilter(0, 0, (table.len() - 1) as u32, last_col)?;
    }

    Ok(())
}
