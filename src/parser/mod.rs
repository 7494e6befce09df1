pub mod columns;
pub mod deserializers;
pub mod pipeline;
pub mod schema;
pub mod types;
pub mod workbook;

pub use pipeline::{parse_csv, parse_csv_reader, parse_file, ParseOutput};
pub use workbook::parse_workbook_reader;
pub use schema::{TicketBatch, TicketSchema};
pub use types::{Dataset, ParseWarning, TicketRecord};
