// Spreadsheet ingestion: the first sheet of a workbook, header on its first row

use std::io::{Cursor, Read};
use std::time::Instant;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveTime;

use crate::error::AppError;
use crate::parser::columns::ColumnMap;
use crate::parser::pipeline::ParseOutput;
use crate::parser::types::Dataset;

/// File extensions routed to the workbook reader.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Cell text as a CSV export of the same sheet would carry it.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(x) => x.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(at) if at.time() == NaiveTime::MIN => at.format("%Y-%m-%d").to_string(),
            Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => dt.as_f64().to_string(),
        },
    }
}

/// Parse the first worksheet of an xlsx/xls/ods workbook. Fully empty
/// rows are dropped; every other row is kept as text.
pub fn parse_workbook_reader<R: Read>(
    mut reader: R,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let start = Instant::now();

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(AppError::EmptyFile),
    };

    let mut sheet_rows = range.rows();
    let header: Vec<String> = match sheet_rows.next() {
        Some(cells) => cells.iter().map(cell_text).collect(),
        None => return Err(AppError::EmptyFile),
    };
    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_names(header.iter().map(String::as_str));

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    let mut row_idx = 0usize;
    for cells in sheet_rows {
        row_idx += 1;
        if row_idx % 500 == 0 {
            progress_cb(row_idx, rows.len());
        }
        let fields: Vec<String> = cells.iter().map(cell_text).collect();
        if fields.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        rows.push(csv::StringRecord::from(fields));
    }

    if rows.is_empty() {
        return Err(AppError::EmptyFile);
    }

    let detected_columns = col_map.all_headers().to_vec();
    log::info!(
        "Loaded {} workbook rows with {} columns",
        rows.len(),
        detected_columns.len()
    );

    Ok(ParseOutput {
        dataset: Dataset::new(col_map, rows),
        warnings: Vec::new(),
        total_rows_processed: row_idx,
        skipped_rows: 0,
        detected_columns,
        delimiter: None,
        parse_duration_ms: start.elapsed().as_millis() as u64,
    })
}
