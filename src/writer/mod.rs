//! Output sinks (C7): a single-object JSON writer for per-tuple
//! comparison records, and a buffered CSV writer for summary/ad-hoc
//! tables, grounded on `examples/original_source/src/utils/writer.h` and
//! `csv_writer.h`.

pub mod csv;
pub mod json;

pub use csv::{CsvWriter, Row};
pub use json::JsonWriter;
