pub mod merged;
pub mod osm;
pub mod region;
pub mod weather;

pub use merged::MergedRecord;
pub use osm::{OsmElement, OsmElementSet, OverpassResponse};
pub use region::Region;
pub use weather::{ApiErrorBody, DaySummary, WeatherObservation, WeatherRecord};
