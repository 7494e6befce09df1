use std::io::Read;
use std::path::Path;
use std::time::Instant;

use crate::error::AppError;
use crate::parser::columns::ColumnMap;
use crate::parser::types::{Dataset, ParseWarning};
use crate::parser::workbook::{parse_workbook_reader, WORKBOOK_EXTENSIONS};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const CANDIDATE_DELIMITERS: &[u8] = &[b',', b';', b'\t'];

/// Output of `parse_csv`: the raw dataset plus import metadata.
#[derive(Debug)]
pub struct ParseOutput {
    pub dataset: Dataset,
    pub warnings: Vec<ParseWarning>,
    pub total_rows_processed: usize,
    pub skipped_rows: usize,
    pub detected_columns: Vec<String>,
    /// Detected field separator; `None` for workbook input.
    pub delimiter: Option<char>,
    pub parse_duration_ms: u64,
}

/// Load a ticket export, dispatching on the file extension: spreadsheet
/// extensions go through the workbook reader, anything else is CSV.
pub fn parse_file(
    path: &str,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    if WORKBOOK_EXTENSIONS.contains(&extension.as_str()) {
        let file = std::fs::File::open(path)?;
        parse_workbook_reader(std::io::BufReader::new(file), progress_cb)
    } else {
        parse_csv(path, progress_cb)
    }
}

/// Parse a CSV ticket export from `path`.
/// `progress_cb(rows_processed, rows_accepted)` is called every 500 rows.
pub fn parse_csv(
    path: &str,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let file = std::fs::File::open(path)?;
    parse_csv_reader(std::io::BufReader::new(file), progress_cb)
}

/// Parse from any `Read` source.
pub fn parse_csv_reader<R: Read>(
    mut reader: R,
    progress_cb: impl Fn(usize, usize),
) -> Result<ParseOutput, AppError> {
    let start = Instant::now();

    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);
    let delimiter = sniff_delimiter(body);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .double_quote(true)
        .quoting(true)
        .from_reader(body);

    // Phase 1: header
    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(AppError::EmptyFile);
    }
    let col_map = ColumnMap::from_headers(&headers);

    // Phase 2: rows, kept verbatim
    let mut rows: Vec<csv::StringRecord> = Vec::with_capacity(10_000);
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut skipped = 0usize;
    let mut row_idx = 0usize;

    for result in rdr.records() {
        row_idx += 1;
        if row_idx % 500 == 0 {
            progress_cb(row_idx, rows.len());
        }

        match result {
            Ok(record) => rows.push(record),
            Err(err) => {
                warnings.push(ParseWarning {
                    line: row_idx + 1, // +1 for the header row
                    message: err.to_string(),
                });
                skipped += 1;
            }
        }
    }

    if rows.is_empty() {
        return Err(AppError::EmptyFile);
    }

    let detected_columns = col_map.all_headers().to_vec();
    log::info!(
        "Loaded {} rows ({} skipped) with {} columns, delimiter {:?}",
        rows.len(),
        skipped,
        detected_columns.len(),
        delimiter as char
    );

    Ok(ParseOutput {
        dataset: Dataset::new(col_map, rows),
        warnings,
        total_rows_processed: row_idx,
        skipped_rows: skipped,
        detected_columns,
        delimiter: Some(delimiter as char),
        parse_duration_ms: start.elapsed().as_millis() as u64,
    })
}

/// Most frequent of `,` `;` TAB on the header line; `,` on a tie or none.
pub fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let header_line = bytes
        .split(|&b| b == b'\n')
        .next()
        .unwrap_or_default();

    let mut best = b',';
    let mut best_count = 0usize;
    for &delim in CANDIDATE_DELIMITERS {
        let count = header_line.iter().filter(|&&b| b == delim).count();
        if count > best_count {
            best = delim;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const HDR: &str = "Ticket Id,Status (Ticket),Program Name,Subject";

    fn parse(csv: &str) -> ParseOutput {
        parse_csv_reader(csv.as_bytes(), |_, _| {}).unwrap()
    }

    fn parse_err(csv: &str) -> AppError {
        parse_csv_reader(csv.as_bytes(), |_, _| {}).unwrap_err()
    }

    // ── Delimiter sniffing ───────────────────────────────────────────────────

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter(b"a,b,c\n1;2;3"), b',');
        assert_eq!(sniff_delimiter(b"a;b;c\n1,2,3"), b';');
        assert_eq!(sniff_delimiter(b"a\tb\tc"), b'\t');
        assert_eq!(sniff_delimiter(b"single"), b',');
        assert_eq!(sniff_delimiter(b""), b',');
    }

    #[test]
    fn test_semicolon_export() {
        let out = parse("Ticket Id;Subject\n1;Printer, second floor\n2;VPN");
        assert_eq!(out.delimiter, Some(';'));
        assert_eq!(out.dataset.len(), 2);
        assert_eq!(out.dataset.value(0, "Subject"), Some("Printer, second floor"));
    }

    // ── Encoding and quoting ─────────────────────────────────────────────────

    #[test]
    fn test_bom_utf8() {
        let csv = format!("\u{FEFF}{HDR}\n1,Closed,Acme,Login");
        let out = parse(&csv);
        assert!(out.dataset.has("Ticket Id"), "BOM must not leak into the first header");
        assert_eq!(out.dataset.value(0, "Ticket Id"), Some("1"));
    }

    #[test]
    fn test_multiline_quoted_field() {
        let csv = format!("{HDR}\n1,Closed,Acme,\"Login fails\nafter reset\"\n2,Reopened,Beta,VPN");
        let out = parse(&csv);
        assert_eq!(out.dataset.len(), 2);
        assert_eq!(out.dataset.value(0, "Subject"), Some("Login fails\nafter reset"));
    }

    #[test]
    fn test_ragged_rows_are_accepted() {
        let csv = format!("{HDR}\n1,Closed\n2,Closed,Acme,VPN,extra");
        let out = parse(&csv);
        assert_eq!(out.dataset.len(), 2);
        assert_eq!(out.skipped_rows, 0);
        assert_eq!(out.dataset.value(0, "Program Name"), None);
    }

    #[test]
    fn test_headers_trimmed() {
        let out = parse(" Ticket Id , Subject \n1,x");
        assert_eq!(out.detected_columns, vec!["Ticket Id", "Subject"]);
    }

    // ── Unexpected input ─────────────────────────────────────────────────────

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_err(""), AppError::EmptyFile));
    }

    #[test]
    fn test_header_only() {
        assert!(matches!(parse_err(HDR), AppError::EmptyFile));
    }

    #[test]
    fn test_missing_workbook_file() {
        let err = parse_file("/nonexistent/tickets.XLSX", |_, _| {}).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_parse_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let csv_path = dir.path().join("tickets.csv");
        std::fs::write(&csv_path, format!("{HDR}\n1,Closed,Acme,Login")).unwrap();
        let out = parse_file(csv_path.to_str().unwrap(), |_, _| {}).unwrap();
        assert_eq!(out.delimiter, Some(','));
        assert_eq!(out.dataset.value(0, "Program Name"), Some("Acme"));

        let mut wb = rust_xlsxwriter::Workbook::new();
        let ws = wb.add_worksheet();
        ws.write_row(0, 0, ["Ticket Id", "Program Name"]).unwrap();
        ws.write_row(1, 0, ["1", "Acme"]).unwrap();
        let xlsx_path = dir.path().join("tickets.xlsx");
        wb.save(&xlsx_path).unwrap();
        let out = parse_file(xlsx_path.to_str().unwrap(), |_, _| {}).unwrap();
        assert_eq!(out.delimiter, None);
        assert_eq!(out.dataset.value(0, "Program Name"), Some("Acme"));
    }

    #[test]
    fn test_missing_file() {
        let err = parse_csv("/nonexistent/tickets.csv", |_, _| {}).unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_progress_callback() {
        use std::cell::Cell;
        let mut csv = String::from(HDR);
        for i in 0..1_000 {
            csv.push_str(&format!("\n{i},Closed,Acme,Subject {i}"));
        }
        let calls = Cell::new(0);
        let out = parse_csv_reader(csv.as_bytes(), |_, _| calls.set(calls.get() + 1)).unwrap();
        assert_eq!(out.total_rows_processed, 1_000);
        assert_eq!(calls.get(), 2);
    }
}
