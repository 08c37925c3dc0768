// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing, encoding detection, and template export

mod csv_parser;
mod template_writer;

pub use csv_parser::{decode_bytes, CsvParser, RawTable};
pub use template_writer::TemplateWriter;
