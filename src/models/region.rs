use geo::{MultiPolygon, Point};

use crate::error::Result;
use crate::utils::constants::{SUDAN_MAX_LAT, SUDAN_MAX_LON, SUDAN_MIN_LAT, SUDAN_MIN_LON};
use crate::utils::geometry::{bounding_box, flatten_rings, guarded_centroid, BoundingBox};

/// One administrative region row: identifiers, reprojected geometry, and
/// the two derived columns (centroid, flattened ring list).
///
/// The centroid is `None` when the geometry fails validation. The row
/// itself is kept so boundary-table row counts never drift against
/// derived outputs; callers filter on `has_centroid` and report skips.
#[derive(Debug, Clone)]
pub struct Region {
    pub country: String,
    pub state_code: String,
    pub state_name: String,
    pub district_code: Option<String>,
    pub district_name: Option<String>,
    pub geometry: MultiPolygon<f64>,
    pub centroid: Option<Point<f64>>,
    pub rings: Vec<Vec<[f64; 2]>>,
}

impl Region {
    pub fn new(
        country: String,
        state_code: String,
        state_name: String,
        district_code: Option<String>,
        district_name: Option<String>,
        geometry: MultiPolygon<f64>,
    ) -> Self {
        let centroid = guarded_centroid(&geometry);
        let rings = flatten_rings(&geometry);

        Self {
            country,
            state_code,
            state_name,
            district_code,
            district_name,
            geometry,
            centroid,
            rings,
        }
    }

    /// Most specific identifier available: district code, else state code.
    pub fn code(&self) -> &str {
        self.district_code.as_deref().unwrap_or(&self.state_code)
    }

    pub fn name(&self) -> &str {
        self.district_name.as_deref().unwrap_or(&self.state_name)
    }

    pub fn has_centroid(&self) -> bool {
        self.centroid.is_some()
    }

    pub fn centroid_lat(&self) -> Option<f64> {
        self.centroid.map(|p| p.y())
    }

    pub fn centroid_lon(&self) -> Option<f64> {
        self.centroid.map(|p| p.x())
    }

    pub fn bounding_box(&self) -> Result<BoundingBox> {
        bounding_box(&self.geometry)
    }

    pub fn is_within_sudan_bounds(&self) -> bool {
        match self.centroid {
            Some(point) => {
                (SUDAN_MIN_LAT..=SUDAN_MAX_LAT).contains(&point.y())
                    && (SUDAN_MIN_LON..=SUDAN_MAX_LON).contains(&point.x())
            }
            None => false,
        }
    }
}
