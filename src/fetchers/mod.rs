pub mod osm_fetcher;
pub mod weather_fetcher;

pub use osm_fetcher::{referenced_node_ids, OsmFetcher};
pub use weather_fetcher::{FetchSummary, SampleRange, WeatherFetcher};
