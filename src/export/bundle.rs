//! Serialization of a report run into its output file: one workbook, a
//! CSV file, or a ZIP archive of per-program workbooks.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;

use crate::clock::date_stamp;
use crate::error::AppError;
use crate::export::safe_file_stem;
use crate::export::sheet::write_table;
use crate::mis::ReportKind;
use crate::report::table::{KeyedEntry, NamedTable, ReportOutput, ReportTable};

/// A rendered output file, not yet on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

// ── Names ─────────────────────────────────────────────────────────────────────

const REQUEST_CLOSED_CSV: &str = "request_ticket_closed_mis.csv";

/// Output file name of `kind` for a run on `today`.
///
/// Client bundles with several programs are archived instead, see
/// [`render`].
pub fn file_name(kind: ReportKind, today: NaiveDate) -> String {
    let stamp = date_stamp(today);
    match kind {
        ReportKind::RequestClosed => REQUEST_CLOSED_CSV.to_string(),
        ReportKind::RequestOpen => format!("Request_open_ticket_{}.xlsx", stamp),
        ReportKind::Client => format!("client_mis_{}.xlsx", stamp),
        _ => format!("{}_{}.xlsx", kind.sheet_name().to_lowercase(), stamp),
    }
}

// ── Writers ───────────────────────────────────────────────────────────────────

fn workbook(sheets: &[(&str, &ReportTable, bool)]) -> Result<Vec<u8>, AppError> {
    let mut wb = Workbook::new();
    for (name, table, highlight) in sheets {
        let ws = wb.add_worksheet();
        ws.set_name(*name)?;
        write_table(ws, table, *highlight)?;
    }
    Ok(wb.save_to_buffer()?)
}

fn named_workbook(tables: &[NamedTable]) -> Result<Vec<u8>, AppError> {
    let sheets: Vec<(&str, &ReportTable, bool)> = tables
        .iter()
        .map(|t| (t.name.as_str(), &t.table, false))
        .collect();
    workbook(&sheets)
}

/// Display values, one record per row; a blank row is a single empty field.
pub fn table_to_csv(table: &ReportTable) -> Result<Vec<u8>, AppError> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in &table.rows {
        if row.cells.is_empty() {
            wtr.write_record([""])?;
            continue;
        }
        wtr.write_record(row.cells.iter().map(|c| c.display()))?;
    }
    wtr.into_inner()
        .map_err(|e| AppError::Custom(format!("CSV flush failed: {}", e)))
}

fn client_archive(entries: &[KeyedEntry], stamp: &str) -> Result<Vec<u8>, AppError> {
    let cursor = std::io::Cursor::new(Vec::new());
    let mut zip = zip::ZipWriter::new(cursor);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    let mut used: HashSet<String> = HashSet::new();
    for entry in entries {
        let bytes = named_workbook(&entry.tables)?;
        let stem = safe_file_stem(&entry.key);
        let mut filename = format!("{}_client_mis_{}.xlsx", stem, stamp);
        let mut n = 2;
        while !used.insert(filename.clone()) {
            filename = format!("{}_{}_client_mis_{}.xlsx", stem, n, stamp);
            n += 1;
        }
        zip.start_file(filename, options)?;
        zip.write_all(&bytes)?;
    }

    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Serialize one report output in memory.
pub fn render(
    kind: ReportKind,
    output: &ReportOutput,
    today: NaiveDate,
) -> Result<ExportFile, AppError> {
    let stamp = date_stamp(today);

    match output {
        ReportOutput::SingleTable { table, .. } if kind == ReportKind::RequestClosed => {
            Ok(ExportFile {
                name: file_name(kind, today),
                bytes: table_to_csv(table)?,
            })
        }
        ReportOutput::SingleTable {
            sheet,
            table,
            highlight,
        } => Ok(ExportFile {
            name: file_name(kind, today),
            bytes: workbook(&[(sheet.as_str(), table, *highlight)])?,
        }),
        ReportOutput::RawPlusSummary { raw, summary } => Ok(ExportFile {
            name: file_name(kind, today),
            bytes: named_workbook(&[raw.clone(), summary.clone()])?,
        }),
        ReportOutput::KeyedBundle { entries } => match entries.as_slice() {
            [single] => Ok(ExportFile {
                name: file_name(kind, today),
                bytes: named_workbook(&single.tables)?,
            }),
            _ => Ok(ExportFile {
                name: format!("client_mis_all_programs_{}.zip", stamp),
                bytes: client_archive(entries, &stamp)?,
            }),
        },
    }
}

/// Render and write into `out_dir`, returning the written path.
pub fn write_output(
    kind: ReportKind,
    output: &ReportOutput,
    out_dir: &Path,
    today: NaiveDate,
) -> Result<PathBuf, AppError> {
    let file = render(kind, output, today)?;
    std::fs::create_dir_all(out_dir)?;
    let path = out_dir.join(&file.name);
    std::fs::write(&path, &file.bytes)?;
    log::info!("Wrote {} ({} bytes)", path.display(), file.bytes.len());
    Ok(path)
}
