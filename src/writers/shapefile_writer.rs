use geo::{LineString, MultiPolygon};
use shapefile::dbase::{FieldName, FieldValue, Record as DbfRecord, TableWriterBuilder};
use shapefile::{Point, PolygonRing};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;

use crate::error::{CollectorError, Result};
use crate::models::{MergedRecord, Region};
use crate::utils::constants::SHAPEFILE_FIELD_NAME_LEN;
use crate::writers::ensure_parent_dir;

const STRING_COLUMNS: [&str; 6] = [
    "country",
    "state_code",
    "state_name",
    "district_code",
    "district_name",
    "date",
];

const NUMERIC_COLUMNS: [&str; 14] = [
    "latitude",
    "longitude",
    "cloud_cover_pct",
    "humidity_pct",
    "precipitation_mm",
    "temp_min_c",
    "temp_max_c",
    "temp_morning_c",
    "temp_afternoon_c",
    "temp_evening_c",
    "temp_night_c",
    "pressure_hpa",
    "wind_max_speed_ms",
    "wind_max_direction_deg",
];

/// Writes merged rows as a legacy ESRI Shapefile: region polygons plus
/// DBF attribute records. DBF caps field names at ten bytes, so longer
/// column names are truncated; the format is lossy here by design and
/// every truncation is logged.
pub struct ShapefileWriter;

impl ShapefileWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write(
        &self,
        regions: &[Region],
        records: &[MergedRecord],
        path: &Path,
    ) -> Result<()> {
        ensure_parent_dir(path)?;

        let truncated: Vec<String> = STRING_COLUMNS
            .iter()
            .chain(NUMERIC_COLUMNS.iter())
            .filter(|name| name.len() > SHAPEFILE_FIELD_NAME_LEN)
            .map(|name| name.to_string())
            .collect();
        if !truncated.is_empty() {
            warn!(
                fields = %truncated.join(", "),
                "DBF field names truncated to {} bytes", SHAPEFILE_FIELD_NAME_LEN
            );
        }

        let mut builder = TableWriterBuilder::new();
        for column in STRING_COLUMNS {
            builder = builder.add_character_field(dbf_field_name(column)?, 80);
        }
        for column in NUMERIC_COLUMNS {
            builder = builder.add_numeric_field(dbf_field_name(column)?, 18, 7);
        }

        let by_code: HashMap<&str, &Region> =
            regions.iter().map(|region| (region.code(), region)).collect();

        let mut writer = shapefile::Writer::from_path(path, builder)?;

        for record in records {
            let code = record
                .district_code
                .as_deref()
                .unwrap_or(&record.state_code);
            let region = by_code.get(code).ok_or_else(|| {
                CollectorError::Export(format!("no boundary geometry for region '{}'", code))
            })?;

            let shape = to_shapefile_polygon(&region.geometry);
            let dbf = to_dbf_record(record);
            writer.write_shape_and_record(&shape, &dbf)?;
        }

        Ok(())
    }
}

impl Default for ShapefileWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Truncate a column name to the DBF limit.
pub fn truncate_field_name(name: &str) -> &str {
    &name[..name.len().min(SHAPEFILE_FIELD_NAME_LEN)]
}

fn dbf_field_name(column: &str) -> Result<FieldName> {
    FieldName::try_from(truncate_field_name(column))
        .map_err(|_| CollectorError::Export(format!("invalid DBF field name: '{}'", column)))
}

fn to_shapefile_polygon(geometry: &MultiPolygon<f64>) -> shapefile::Polygon {
    let mut rings = Vec::new();

    for polygon in geometry.0.iter() {
        rings.push(PolygonRing::Outer(ring_points(polygon.exterior())));
        for interior in polygon.interiors() {
            rings.push(PolygonRing::Inner(ring_points(interior)));
        }
    }

    shapefile::Polygon::with_rings(rings)
}

fn ring_points(ring: &LineString<f64>) -> Vec<Point> {
    ring.coords().map(|c| Point::new(c.x, c.y)).collect()
}

fn to_dbf_record(record: &MergedRecord) -> DbfRecord {
    let mut dbf = DbfRecord::default();

    let mut set_string = |column: &str, value: Option<String>| {
        dbf.insert(
            truncate_field_name(column).to_string(),
            FieldValue::Character(value),
        );
    };
    set_string("country", Some(record.country.clone()));
    set_string("state_code", Some(record.state_code.clone()));
    set_string("state_name", Some(record.state_name.clone()));
    set_string("district_code", record.district_code.clone());
    set_string("district_name", record.district_name.clone());
    set_string("date", record.date.map(|d| d.format("%Y-%m-%d").to_string()));

    let mut set_number = |column: &str, value: Option<f64>| {
        dbf.insert(
            truncate_field_name(column).to_string(),
            FieldValue::Numeric(value),
        );
    };
    set_number("latitude", record.latitude);
    set_number("longitude", record.longitude);
    set_number("cloud_cover_pct", record.cloud_cover_pct);
    set_number("humidity_pct", record.humidity_pct);
    set_number("precipitation_mm", record.precipitation_mm);
    set_number("temp_min_c", record.temp_min_c);
    set_number("temp_max_c", record.temp_max_c);
    set_number("temp_morning_c", record.temp_morning_c);
    set_number("temp_afternoon_c", record.temp_afternoon_c);
    set_number("temp_evening_c", record.temp_evening_c);
    set_number("temp_night_c", record.temp_night_c);
    set_number("pressure_hpa", record.pressure_hpa);
    set_number("wind_max_speed_ms", record.wind_max_speed_ms);
    set_number("wind_max_direction_deg", record.wind_max_direction_deg);

    dbf
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::polygon;
    use tempfile::TempDir;

    fn region() -> Region {
        Region::new(
            "Sudan".to_string(),
            "SDN.8_1".to_string(),
            "Khartoum".to_string(),
            None,
            None,
            MultiPolygon::new(vec![polygon![
                (x: 32.0, y: 15.0),
                (x: 33.0, y: 15.0),
                (x: 33.0, y: 16.0),
                (x: 32.0, y: 16.0),
                (x: 32.0, y: 15.0),
            ]]),
        )
    }

    #[test]
    fn test_truncate_field_name() {
        assert_eq!(truncate_field_name("date"), "date");
        assert_eq!(truncate_field_name("state_code"), "state_code");
        assert_eq!(truncate_field_name("precipitation_mm"), "precipitat");
        assert_eq!(truncate_field_name("wind_max_direction_deg"), "wind_max_d");
    }

    #[test]
    fn test_truncated_names_stay_unique() {
        let mut names: Vec<&str> = STRING_COLUMNS
            .iter()
            .chain(NUMERIC_COLUMNS.iter())
            .map(|c| truncate_field_name(c))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_write_and_reload_shapefile() {
        let region = region();
        let records = vec![MergedRecord::from_region(&region)];

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("merged.shp");
        ShapefileWriter::new().write(&[region], &records, &path).unwrap();

        let mut reader = shapefile::Reader::from_path(&path).unwrap();
        let rows: Vec<_> = reader
            .iter_shapes_and_records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(rows.len(), 1);
        let (shape, dbf) = &rows[0];
        assert!(matches!(shape, shapefile::Shape::Polygon(_)));

        match dbf.get("state_name") {
            Some(FieldValue::Character(Some(name))) => assert_eq!(name, "Khartoum"),
            other => panic!("unexpected state_name field: {:?}", other),
        }
        // Long names only exist under their truncated spelling
        assert!(dbf.get("precipitation_mm").is_none());
        assert!(dbf.get("precipitat").is_some());
    }
}
