pub mod boundary_reader;
pub mod weather_reader;

pub use boundary_reader::{count_missing_centroids, BoundaryReader};
pub use weather_reader::WeatherReader;
