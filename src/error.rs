use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectorError>;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Weather API error (status {status}): {message}")]
    WeatherApi { status: u16, message: String },

    #[error("Weather record validation error: {message}")]
    WeatherValidation { message: String },

    #[error("Overpass API error (status {status}): {body}")]
    Overpass { status: u16, body: String },

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    #[error("Shapefile error: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    #[error("Invalid boundary data: {0}")]
    BoundaryFormat(String),

    #[error("Geometry has no extent: {0}")]
    EmptyGeometry(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Merge error: {0}")]
    Merge(String),

    #[error("Missing required data: {0}")]
    MissingData(String),

    #[error("Export error: {0}")]
    Export(String),
}
