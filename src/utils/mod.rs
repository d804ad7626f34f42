pub mod constants;
pub mod filename;
pub mod geometry;
pub mod progress;

pub use constants::*;
pub use filename::{dated_filename, default_output_path};
pub use geometry::{bounding_box, flatten_rings, guarded_centroid, BoundingBox, Crs};
pub use progress::ProgressReporter;
