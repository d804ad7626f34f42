use geo::{Coord, LineString, MultiPolygon, Polygon};
use geojson::GeoJson;
use serde_json::Value as JsonValue;
use shapefile::dbase::FieldValue;
use shapefile::{PolygonRing, Shape};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{CollectorError, Result};
use crate::models::Region;
use crate::utils::geometry::{reproject, Crs};

/// Attribute keys accepted for each identifier column. GADM-style names
/// first, then this tool's own export names so its GeoJSON/Shapefile
/// output reloads cleanly, then truncated DBF spellings.
const COUNTRY_KEYS: [&str; 4] = ["COUNTRY", "NAME_0", "country", "ADM0_EN"];
const STATE_CODE_KEYS: [&str; 3] = ["GID_1", "state_code", "ADM1_PCODE"];
const STATE_NAME_KEYS: [&str; 3] = ["NAME_1", "state_name", "ADM1_EN"];
const DISTRICT_CODE_KEYS: [&str; 4] = ["GID_2", "district_code", "district_c", "ADM2_PCODE"];
const DISTRICT_NAME_KEYS: [&str; 4] = ["NAME_2", "district_name", "district_n", "ADM2_EN"];

/// Reads an administrative-boundary polygon dataset (GeoJSON or ESRI
/// Shapefile), reprojects to WGS84 degrees, and derives the centroid and
/// flattened-ring columns for each region.
pub struct BoundaryReader {
    forced_crs: Option<Crs>,
}

impl BoundaryReader {
    pub fn new() -> Self {
        Self { forced_crs: None }
    }

    /// Force a source CRS instead of detecting it from the file.
    pub fn with_crs(forced_crs: Crs) -> Self {
        Self {
            forced_crs: Some(forced_crs),
        }
    }

    /// Read all regions from a boundary file, dispatching on extension.
    pub fn read_regions(&self, path: &Path) -> Result<Vec<Region>> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "geojson" | "json" => self.read_geojson(path),
            "shp" => self.read_shapefile(path),
            other => Err(CollectorError::BoundaryFormat(format!(
                "Unsupported boundary file extension: '{}'",
                other
            ))),
        }
    }

    fn read_geojson(&self, path: &Path) -> Result<Vec<Region>> {
        let contents = fs::read_to_string(path)?;
        let geojson: GeoJson = contents.parse()?;

        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            _ => {
                return Err(CollectorError::BoundaryFormat(
                    "Expected a GeoJSON FeatureCollection".to_string(),
                ))
            }
        };

        // GeoJSON coordinates are WGS84 by specification
        let crs = self.forced_crs.unwrap_or(Crs::Wgs84);
        let mut regions = Vec::new();

        for (index, feature) in collection.features.into_iter().enumerate() {
            let geometry = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(geojson::Value::Polygon(rings)) => {
                    MultiPolygon::new(vec![polygon_from_positions(rings)?])
                }
                Some(geojson::Value::MultiPolygon(polygons)) => MultiPolygon::new(
                    polygons
                        .iter()
                        .map(|rings| polygon_from_positions(rings))
                        .collect::<Result<Vec<_>>>()?,
                ),
                _ => {
                    warn!(feature = index, "skipping feature without polygon geometry");
                    continue;
                }
            };

            let properties = feature.properties.unwrap_or_default();
            let lookup = |keys: &[&str]| -> Option<String> {
                keys.iter()
                    .find_map(|key| properties.get(*key).and_then(json_string))
            };

            let state_name = lookup(&STATE_NAME_KEYS).ok_or_else(|| {
                CollectorError::BoundaryFormat(format!(
                    "Feature {} has no state name attribute",
                    index
                ))
            })?;

            regions.push(self.build_region(
                lookup(&COUNTRY_KEYS),
                lookup(&STATE_CODE_KEYS),
                state_name,
                lookup(&DISTRICT_CODE_KEYS),
                lookup(&DISTRICT_NAME_KEYS),
                geometry,
                crs,
            ));
        }

        Ok(regions)
    }

    fn read_shapefile(&self, path: &Path) -> Result<Vec<Region>> {
        let crs = match self.forced_crs {
            Some(crs) => crs,
            None => detect_shapefile_crs(path)?,
        };

        let mut reader = shapefile::Reader::from_path(path)?;
        let mut regions = Vec::new();

        for (index, entry) in reader.iter_shapes_and_records().enumerate() {
            let (shape, record) = entry?;

            let geometry = match shape {
                Shape::Polygon(polygon) => shapefile_polygon_to_geo(&polygon),
                _ => {
                    warn!(feature = index, "skipping non-polygon shape");
                    continue;
                }
            };

            let lookup = |keys: &[&str]| -> Option<String> {
                keys.iter().find_map(|key| field_string(&record, key))
            };

            let state_name = lookup(&STATE_NAME_KEYS).ok_or_else(|| {
                CollectorError::BoundaryFormat(format!(
                    "Record {} has no state name attribute",
                    index
                ))
            })?;

            regions.push(self.build_region(
                lookup(&COUNTRY_KEYS),
                lookup(&STATE_CODE_KEYS),
                state_name,
                lookup(&DISTRICT_CODE_KEYS),
                lookup(&DISTRICT_NAME_KEYS),
                geometry,
                crs,
            ));
        }

        Ok(regions)
    }

    #[allow(clippy::too_many_arguments)]
    fn build_region(
        &self,
        country: Option<String>,
        state_code: Option<String>,
        state_name: String,
        district_code: Option<String>,
        district_name: Option<String>,
        geometry: MultiPolygon<f64>,
        crs: Crs,
    ) -> Region {
        let geometry = reproject(&geometry, crs);
        let region = Region::new(
            country.unwrap_or_else(|| "Sudan".to_string()),
            state_code.unwrap_or_else(|| state_name.clone()),
            state_name,
            district_code,
            district_name,
            geometry,
        );

        if !region.has_centroid() {
            warn!(region = region.code(), "invalid geometry, centroid skipped");
        }

        region
    }
}

impl Default for BoundaryReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Count of regions whose geometry failed validation.
pub fn count_missing_centroids(regions: &[Region]) -> usize {
    regions.iter().filter(|r| !r.has_centroid()).count()
}

fn detect_shapefile_crs(path: &Path) -> Result<Crs> {
    let prj_path = path.with_extension("prj");
    if !prj_path.exists() {
        warn!(path = %path.display(), "no .prj sidecar, assuming WGS84");
        return Ok(Crs::Wgs84);
    }

    let wkt = fs::read_to_string(&prj_path)?;
    Crs::from_prj(&wkt)
}

fn polygon_from_positions(rings: &[Vec<Vec<f64>>]) -> Result<Polygon<f64>> {
    let mut converted = rings.iter().map(|ring| {
        ring.iter()
            .map(|position| {
                if position.len() < 2 {
                    return Err(CollectorError::BoundaryFormat(
                        "GeoJSON position with fewer than two ordinates".to_string(),
                    ));
                }
                Ok(Coord {
                    x: position[0],
                    y: position[1],
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(LineString::new)
    });

    let exterior = converted.next().transpose()?.ok_or_else(|| {
        CollectorError::BoundaryFormat("Polygon with no exterior ring".to_string())
    })?;
    let interiors = converted.collect::<Result<Vec<_>>>()?;

    Ok(Polygon::new(exterior, interiors))
}

fn shapefile_polygon_to_geo(polygon: &shapefile::Polygon) -> MultiPolygon<f64> {
    let mut polygons: Vec<Polygon<f64>> = Vec::new();

    for ring in polygon.rings() {
        let coords: Vec<Coord<f64>> = ring
            .points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect();
        let line = LineString::new(coords);

        match ring {
            PolygonRing::Outer(_) => polygons.push(Polygon::new(line, vec![])),
            PolygonRing::Inner(_) => match polygons.last_mut() {
                Some(last) => last.interiors_push(line),
                None => warn!("inner ring before any outer ring, skipping"),
            },
        }
    }

    MultiPolygon::new(polygons)
}

fn json_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_string(record: &shapefile::dbase::Record, key: &str) -> Option<String> {
    match record.get(key)? {
        FieldValue::Character(Some(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        FieldValue::Numeric(Some(n)) => Some(n.to_string()),
        _ => None,
    }
}
