use std::collections::HashMap;

use crate::error::Result;
use crate::models::{MergedRecord, Region, WeatherRecord};
use crate::utils::constants::COORD_KEY_SCALE;

/// Join key at micro-degree precision. Exact coordinate equality is the
/// intended join semantics; the rounding only keeps keys stable across a
/// decimal round-trip through the weather CSV.
pub fn coordinate_key(lat: f64, lon: f64) -> (i64, i64) {
    (
        (lat * COORD_KEY_SCALE).round() as i64,
        (lon * COORD_KEY_SCALE).round() as i64,
    )
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MergeSummary {
    pub regions: usize,
    pub regions_matched: usize,
    pub regions_unmatched: usize,
    pub weather_rows: usize,
    pub output_rows: usize,
}

impl MergeSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} regions ({} matched, {} without weather) x {} weather rows -> {} output rows",
            self.regions,
            self.regions_matched,
            self.regions_unmatched,
            self.weather_rows,
            self.output_rows
        )
    }
}

/// Left-joins the boundary table onto the weather table by centroid
/// coordinate. Every boundary row appears in the output: once per
/// matching weather row, or once with empty weather fields.
pub struct RecordMerger;

impl RecordMerger {
    pub fn new() -> Self {
        Self
    }

    pub fn merge(
        &self,
        regions: &[Region],
        weather: &[WeatherRecord],
    ) -> Result<(Vec<MergedRecord>, MergeSummary)> {
        let mut by_coordinate: HashMap<(i64, i64), Vec<&WeatherRecord>> = HashMap::new();
        for record in weather {
            by_coordinate
                .entry(coordinate_key(record.latitude, record.longitude))
                .or_default()
                .push(record);
        }

        let mut records = Vec::new();
        let mut summary = MergeSummary {
            regions: regions.len(),
            weather_rows: weather.len(),
            ..Default::default()
        };

        for region in regions {
            let matches = region
                .centroid
                .map(|point| coordinate_key(point.y(), point.x()))
                .and_then(|key| by_coordinate.get(&key));

            match matches {
                Some(rows) => {
                    summary.regions_matched += 1;
                    for row in rows {
                        records.push(MergedRecord::with_weather(region, row));
                    }
                }
                None => {
                    summary.regions_unmatched += 1;
                    records.push(MergedRecord::from_region(region));
                }
            }
        }

        records.sort_by(|a, b| {
            a.state_code
                .cmp(&b.state_code)
                .then_with(|| a.district_code.cmp(&b.district_code))
                .then_with(|| a.date.cmp(&b.date))
        });

        summary.output_rows = records.len();
        Ok((records, summary))
    }
}

impl Default for RecordMerger {
    fn default() -> Self {
        Self::new()
    }
}
