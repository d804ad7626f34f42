use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::models::{MergedRecord, OsmElementSet};
use crate::writers::ensure_parent_dir;

/// Writes newline-delimited JSON: one record object per line.
pub struct JsonWriter;

impl JsonWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_merged_records(&self, records: &[MergedRecord], path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let mut writer = BufWriter::new(File::create(path)?);

        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_element_sets(&self, sets: &[OsmElementSet], path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let mut writer = BufWriter::new(File::create(path)?);

        for set in sets {
            serde_json::to_writer(&mut writer, set)?;
            writeln!(writer)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        Self::new()
    }
}
