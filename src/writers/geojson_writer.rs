use geo::{LineString, MultiPolygon};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::error::{CollectorError, Result};
use crate::models::{MergedRecord, Region};
use crate::writers::ensure_parent_dir;

/// Writes merged rows as a GeoJSON FeatureCollection: one feature per
/// row, the region polygon as the feature geometry and the export
/// projection as properties.
pub struct GeoJsonWriter;

impl GeoJsonWriter {
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

        let by_code: HashMap<&str, &Region> =
            regions.iter().map(|region| (region.code(), region)).collect();

        let mut features = Vec::with_capacity(records.len());
        for record in records {
            let code = record
                .district_code
                .as_deref()
                .unwrap_or(&record.state_code);
            let region = by_code.get(code).ok_or_else(|| {
                CollectorError::Export(format!("no boundary geometry for region '{}'", code))
            })?;

            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(multipolygon_value(&region.geometry))),
                id: None,
                properties: Some(record_properties(record)?),
                foreign_members: None,
            });
        }

        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };

        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(writer, &collection)?;
        Ok(())
    }
}

impl Default for GeoJsonWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn multipolygon_value(geometry: &MultiPolygon<f64>) -> Value {
    Value::MultiPolygon(
        geometry
            .0
            .iter()
            .map(|polygon| {
                let mut rings = vec![ring_positions(polygon.exterior())];
                rings.extend(polygon.interiors().iter().map(ring_positions));
                rings
            })
            .collect(),
    )
}

fn ring_positions(ring: &LineString<f64>) -> Vec<Vec<f64>> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

fn record_properties(record: &MergedRecord) -> Result<JsonObject> {
    match serde_json::to_value(record)? {
        JsonValue::Object(map) => Ok(map),
        _ => Err(CollectorError::Export(
            "merged record did not serialize to an object".to_string(),
        )),
    }
}
