use geo::{BoundingRect, Centroid, Coord, MapCoords, MultiPolygon, Point, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{CollectorError, Result};

/// WGS84 ellipsoid parameters
const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
/// Transverse Mercator scale factor at the central meridian
const UTM_K0: f64 = 0.9996;
const UTM_FALSE_EASTING: f64 = 500_000.0;
const UTM_FALSE_NORTHING: f64 = 10_000_000.0;

/// Axis-aligned rectangle enclosing a geometry, stored in the
/// (min-lat, min-lon, max-lat, max-lon) order Overpass expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn new(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Result<Self> {
        if min_lat > max_lat || min_lon > max_lon {
            return Err(CollectorError::InvalidCoordinate(format!(
                "Degenerate bounding box: ({}, {}, {}, {})",
                min_lat, min_lon, max_lat, max_lon
            )));
        }
        Ok(Self {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        })
    }

    /// Overpass bbox filter string: "south,west,north,east"
    pub fn to_overpass_string(&self) -> String {
        format!(
            "{:.7},{:.7},{:.7},{:.7}",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }

    /// Smallest box enclosing both boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min_lat: self.min_lat.min(other.min_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lat: self.max_lat.max(other.max_lat),
            max_lon: self.max_lon.max(other.max_lon),
        }
    }
}

/// Derive a bounding box from polygon bounds. Geometry x/y is lon/lat, so
/// this also performs the (min-lon, min-lat, max-lon, max-lat) to
/// (min-lat, min-lon, max-lat, max-lon) reorder.
pub fn bounding_box(geometry: &MultiPolygon<f64>) -> Result<BoundingBox> {
    let rect = geometry
        .bounding_rect()
        .ok_or_else(|| CollectorError::EmptyGeometry("cannot derive bounding box".to_string()))?;

    BoundingBox::new(rect.min().y, rect.min().x, rect.max().y, rect.max().x)
}

/// Centroid of a geometry, computed only when the geometry passes a
/// validity check. Invalid geometries yield `None` so callers can count
/// and report the skip instead of dropping the row.
pub fn guarded_centroid(geometry: &MultiPolygon<f64>) -> Option<Point<f64>> {
    if !geometry.is_valid() {
        return None;
    }
    geometry.centroid()
}

/// Flatten a multi-polygon into a nested coordinate list: one outer entry
/// per constituent ring (exterior first, then interiors, polygons in
/// order), each ring a list of [lon, lat] pairs.
pub fn flatten_rings(geometry: &MultiPolygon<f64>) -> Vec<Vec<[f64; 2]>> {
    let mut rings = Vec::new();

    for polygon in geometry.0.iter() {
        rings.push(ring_coords(polygon.exterior()));
        for interior in polygon.interiors() {
            rings.push(ring_coords(interior));
        }
    }

    rings
}

fn ring_coords(ring: &geo::LineString<f64>) -> Vec<[f64; 2]> {
    ring.coords().map(|c| [c.x, c.y]).collect()
}

/// Source coordinate reference systems the boundary loader can reproject
/// from. Everything else is rejected rather than silently passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    Wgs84,
    WebMercator,
    Utm { zone: u8, north: bool },
}

impl Crs {
    /// Detect the CRS from ESRI `.prj` well-known text.
    pub fn from_prj(wkt: &str) -> Result<Self> {
        let upper = wkt.to_uppercase();

        if upper.contains("MERCATOR_AUXILIARY_SPHERE")
            || upper.contains("PSEUDO-MERCATOR")
            || upper.contains("WEB_MERCATOR")
            || upper.contains("3857")
        {
            return Ok(Crs::WebMercator);
        }

        if let Some(pos) = upper.find("UTM_ZONE_").or_else(|| upper.find("UTM ZONE ")) {
            let tail = &upper[pos + "UTM_ZONE_".len()..];
            let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
            let zone = digits.parse::<u8>().map_err(|_| {
                CollectorError::UnsupportedCrs(format!("unparseable UTM zone in: {}", wkt.trim()))
            })?;
            if !(1..=60).contains(&zone) {
                return Err(CollectorError::UnsupportedCrs(format!(
                    "UTM zone {} out of range",
                    zone
                )));
            }
            let north = !tail[digits.len()..].trim_start().starts_with('S');
            return Ok(Crs::Utm { zone, north });
        }

        if upper.contains("GCS_WGS_1984") || upper.contains("WGS 84") || upper.contains("WGS_1984")
        {
            return Ok(Crs::Wgs84);
        }

        Err(CollectorError::UnsupportedCrs(wkt.trim().to_string()))
    }
}

/// Convert a Web Mercator (EPSG:3857) coordinate to (lon, lat) degrees.
///
/// # Examples
/// ```
/// use sudan_geodata::utils::geometry::web_mercator_to_wgs84;
///
/// let (lon, lat) = web_mercator_to_wgs84(0.0, 0.0);
/// assert!(lon.abs() < 1e-9 && lat.abs() < 1e-9);
/// ```
pub fn web_mercator_to_wgs84(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / WGS84_A).to_degrees();
    let lat = (2.0 * (y / WGS84_A).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

/// Convert a UTM easting/northing to (lon, lat) degrees using the inverse
/// Transverse Mercator series (Snyder, Map Projections ch. 8).
pub fn utm_to_wgs84(easting: f64, northing: f64, zone: u8, north: bool) -> (f64, f64) {
    let e2 = WGS84_F * (2.0 - WGS84_F);
    let ep2 = e2 / (1.0 - e2);
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

    let x = easting - UTM_FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - UTM_FALSE_NORTHING
    };

    let m = y / UTM_K0;
    let mu = m
        / (WGS84_A
            * (1.0 - e2 / 4.0 - 3.0 * e2.powi(2) / 64.0 - 5.0 * e2.powi(3) / 256.0));

    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let sin_phi1 = phi1.sin();
    let cos_phi1 = phi1.cos();
    let tan_phi1 = phi1.tan();

    let c1 = ep2 * cos_phi1.powi(2);
    let t1 = tan_phi1.powi(2);
    let n1 = WGS84_A / (1.0 - e2 * sin_phi1.powi(2)).sqrt();
    let r1 = WGS84_A * (1.0 - e2) / (1.0 - e2 * sin_phi1.powi(2)).powf(1.5);
    let d = x / (n1 * UTM_K0);

    let lat = phi1
        - (n1 * tan_phi1 / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1.powi(2) - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1.powi(2)
                    - 252.0 * ep2
                    - 3.0 * c1.powi(2))
                    * d.powi(6)
                    / 720.0);

    let lon = (d
        - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
        + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1.powi(2) + 8.0 * ep2 + 24.0 * t1.powi(2))
            * d.powi(5)
            / 120.0)
        / cos_phi1;

    let central_meridian = f64::from(zone) * 6.0 - 183.0;

    (central_meridian + lon.to_degrees(), lat.to_degrees())
}

/// Reproject every coordinate of a multi-polygon into WGS84 degrees.
pub fn reproject(geometry: &MultiPolygon<f64>, crs: Crs) -> MultiPolygon<f64> {
    match crs {
        Crs::Wgs84 => geometry.clone(),
        Crs::WebMercator => geometry.map_coords(|c| {
            let (lon, lat) = web_mercator_to_wgs84(c.x, c.y);
            Coord { x: lon, y: lat }
        }),
        Crs::Utm { zone, north } => geometry.map_coords(|c| {
            let (lon, lat) = utm_to_wgs84(c.x, c.y, zone, north);
            Coord { x: lon, y: lat }
        }),
    }
}
