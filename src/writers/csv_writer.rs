use std::path::Path;

use crate::error::Result;
use crate::models::{MergedRecord, WeatherRecord};
use crate::writers::ensure_parent_dir;

/// Writes weather and merged tables as CSV, geometry dropped.
pub struct CsvWriter;

impl CsvWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_weather_records(&self, records: &[WeatherRecord], path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let mut writer = csv::Writer::from_path(path)?;

        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_merged_records(&self, records: &[MergedRecord], path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let mut writer = csv::Writer::from_path(path)?;

        for record in records {
            writer.serialize(record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_weather_csv() {
        let record = WeatherRecord {
            latitude: 15.5,
            longitude: 32.5,
            date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
            cloud_cover_pct: Some(12.0),
            humidity_pct: None,
            precipitation_mm: Some(0.0),
            temp_min_c: Some(18.0),
            temp_max_c: Some(34.0),
            temp_morning_c: None,
            temp_afternoon_c: None,
            temp_evening_c: None,
            temp_night_c: None,
            pressure_hpa: None,
            wind_max_speed_ms: None,
            wind_max_direction_deg: None,
        };

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("weather.csv");
        CsvWriter::new().write_weather_records(&[record], &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        let header = lines.next().unwrap();

        assert!(header.starts_with("latitude,longitude,date"));
        assert!(header.contains("precipitation_mm"));

        let row = lines.next().unwrap();
        assert!(row.contains("2022-01-01"));
        assert!(row.contains("34.0"));
    }
}
