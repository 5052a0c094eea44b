//! A buffered, flush-at-end CSV sink, grounded on
//! `examples/original_source/src/utils/csv_writer.{h,cpp}`: accumulate
//! rows (positional or header-keyed), then write the whole file at once.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;

/// One row, either a positional list of fields or a map keyed by header
/// name (the original's two `add_row` overloads).
pub enum Row {
    Positional(Vec<String>),
    Keyed(HashMap<String, String>),
}

pub struct CsvWriter {
    output_dir: PathBuf,
    filename: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl CsvWriter {
    pub fn new(output_dir: impl Into<PathBuf>, filename: impl Into<String>, headers: Vec<String>) -> Self {
        CsvWriter {
            output_dir: output_dir.into(),
            filename: filename.into(),
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, skipping and warning if its width doesn't match the
    /// configured headers (SPEC_FULL.md §4.7).
    pub fn add_row(&mut self, row: Row) {
        let resolved = match row {
            Row::Positional(fields) => fields,
            Row::Keyed(map) => {
                if map.len() != self.headers.len() {
                    tracing::warn!(
                        filename = %self.filename,
                        expected = self.headers.len(),
                        got = map.len(),
                        "csv row size does not match headers, skipping"
                    );
                    return;
                }
                match self.headers.iter().map(|h| map.get(h).cloned()).collect::<Option<Vec<_>>>() {
                    Some(fields) => fields,
                    None => {
                        tracing::warn!(
                            filename = %self.filename,
                            "csv row missing a configured header key, skipping"
                        );
                        return;
                    }
                }
            }
        };
        if resolved.len() != self.headers.len() {
            tracing::warn!(
                filename = %self.filename,
                expected = self.headers.len(),
                got = resolved.len(),
                "csv row size does not match headers, skipping"
            );
            return;
        }
        self.rows.push(resolved);
    }

    pub fn write(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(&self.filename);
        let mut writer = csv::WriterBuilder::new().from_path(path)?;
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}
