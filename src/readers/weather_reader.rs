use std::path::Path;

use crate::error::Result;
use crate::models::WeatherRecord;

/// Reads a weather table previously written by the `weather` command back
/// into typed records for merging.
pub struct WeatherReader;

impl WeatherReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_records(&self, path: &Path) -> Result<Vec<WeatherRecord>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut records = Vec::new();

        for result in reader.deserialize() {
            let record: WeatherRecord = result?;
            records.push(record);
        }

        Ok(records)
    }
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new()
    }
}
