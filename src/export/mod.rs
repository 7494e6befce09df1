pub mod bundle;
pub mod sheet;

pub use bundle::{file_name, render, write_output, ExportFile};

use rust_xlsxwriter::{Format, FormatBorder};

/// Blue header #2C5F8A, white bold text, thin border
pub fn create_header_format() -> Format {
    Format::new()
        .set_bold()
        .set_background_color("2C5F8A")
        .set_font_color("FFFFFF")
        .set_font_size(11)
        .set_border(FormatBorder::Thin)
        .set_text_wrap()
}

/// Section title above a stacked sub-table
pub fn create_title_format() -> Format {
    Format::new().set_bold().set_font_size(12)
}

pub fn create_notice_format() -> Format {
    Format::new().set_italic()
}

/// Grand Total rows
pub fn create_total_format() -> Format {
    Format::new().set_bold().set_border_top(FormatBorder::Thin)
}

pub fn create_date_format() -> Format {
    Format::new().set_num_format("yyyy-mm-dd")
}

/// One decimal, 0.0
pub fn create_number_format() -> Format {
    Format::new().set_num_format("0.0")
}

pub fn create_integer_format() -> Format {
    Format::new().set_num_format("0")
}

/// Whole percentage stored as a fraction
pub fn create_percent_format() -> Format {
    Format::new().set_num_format("0%")
}

/// Red fill of crossed-SLA rows.
pub fn highlight(format: Format) -> Format {
    format.set_background_color("FF0000")
}

/// "Acme/North" → "Acme_North", safe for file and archive entry names.
pub fn safe_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}
