pub mod csv_writer;
pub mod geojson_writer;
pub mod json_writer;
pub mod shapefile_writer;

pub use csv_writer::CsvWriter;
pub use geojson_writer::GeoJsonWriter;
pub use json_writer::JsonWriter;
pub use shapefile_writer::ShapefileWriter;

use crate::error::Result;
use std::path::Path;

/// Create the output file's parent directory when it does not exist yet.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
