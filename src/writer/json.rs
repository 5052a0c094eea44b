//! A single-JSON-object sink, grounded on
//! `examples/original_source/src/utils/writer.h` (open-once,
//! directory-creating) with `serde_json` supplying the actual encoding.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::Result;

/// Writes one JSON object (a map of comparison-record keys to records, or
/// any other `Serialize` value) to `{output_dir}/{name}.json`.
pub struct JsonWriter {
    output_dir: PathBuf,
    name: String,
}

impl JsonWriter {
    pub fn new(output_dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        JsonWriter {
            output_dir: output_dir.into(),
            name: name.into(),
        }
    }

    fn path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.name))
    }

    pub fn write<T: Serialize>(&self, value: &T) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        let file = File::create(self.path())?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        self.path()
    }
}

pub fn path_for(output_dir: impl AsRef<Path>, name: &str) -> PathBuf {
    output_dir.as_ref().join(format!("{name}.json"))
}
