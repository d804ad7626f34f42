/// Remote endpoints
pub const WEATHER_ENDPOINT: &str = "https://api.openweathermap.org/data/3.0/onecall/day_summary";
pub const OVERPASS_ENDPOINT: &str = "https://overpass-api.de/api/interpreter";

/// Weather request defaults
pub const WEATHER_UNITS: &str = "metric";
pub const DEFAULT_TIMEZONE: &str = "+02:00";
pub const DEFAULT_STRIDE_DAYS: i64 = 7;
pub const REQUEST_PAUSE_SECS: u64 = 1;

/// Overpass request defaults
pub const OVERPASS_TIMEOUT_SECS: u32 = 180;
pub const NODE_BATCH_SIZE: usize = 50;

/// Way tags retrieved from Overpass
pub const OSM_WAY_TAGS: [&str; 3] = ["highway", "railway", "waterway"];

/// Sudan geographic bounds (post-2011 borders)
pub const SUDAN_MIN_LAT: f64 = 9.35;
pub const SUDAN_MAX_LAT: f64 = 22.23;
pub const SUDAN_MIN_LON: f64 = 21.81;
pub const SUDAN_MAX_LON: f64 = 38.61;

/// Merge join key precision (micro-degrees)
pub const COORD_KEY_SCALE: f64 = 1_000_000.0;

/// DBF format limit on attribute field names
pub const SHAPEFILE_FIELD_NAME_LEN: usize = 10;

/// Output format identifiers
pub const FORMAT_CSV: &str = "csv";
pub const FORMAT_JSON: &str = "json";
pub const FORMAT_GEOJSON: &str = "geojson";
pub const FORMAT_SHAPEFILE: &str = "shapefile";
