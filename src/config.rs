use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::error::Result;
use crate::utils::constants::{
    DEFAULT_TIMEZONE, NODE_BATCH_SIZE, OVERPASS_ENDPOINT, REQUEST_PAUSE_SECS, WEATHER_ENDPOINT,
    WEATHER_UNITS,
};

/// Runtime settings, layered defaults < optional `sudan-geodata.toml` <
/// `SUDAN_GEODATA_*` environment variables. Command-line flags override
/// individual fields after loading.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectorSettings {
    pub weather_endpoint: String,
    pub overpass_endpoint: String,
    pub request_pause_secs: u64,
    pub node_batch_size: usize,
    pub timezone: String,
    pub units: String,
}

impl CollectorSettings {
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            .set_default("weather_endpoint", WEATHER_ENDPOINT)?
            .set_default("overpass_endpoint", OVERPASS_ENDPOINT)?
            .set_default("request_pause_secs", REQUEST_PAUSE_SECS as i64)?
            .set_default("node_batch_size", NODE_BATCH_SIZE as i64)?
            .set_default("timezone", DEFAULT_TIMEZONE)?
            .set_default("units", WEATHER_UNITS)?;

        let builder = match path {
            Some(file) => builder.add_source(File::from(file)),
            None => builder.add_source(File::with_name("sudan-geodata").required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix("SUDAN_GEODATA"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = CollectorSettings::load().unwrap();

        assert_eq!(settings.request_pause_secs, 1);
        assert_eq!(settings.node_batch_size, 50);
        assert_eq!(settings.units, "metric");
        assert!(settings.weather_endpoint.starts_with("https://"));
        assert!(settings.overpass_endpoint.contains("overpass"));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "request_pause_secs = 3").unwrap();
        writeln!(file, "timezone = \"+03:00\"").unwrap();

        let settings = CollectorSettings::load_from(Some(file.path())).unwrap();

        assert_eq!(settings.request_pause_secs, 3);
        assert_eq!(settings.timezone, "+03:00");
        // Untouched keys keep their defaults
        assert_eq!(settings.node_batch_size, 50);
    }
}
