use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{CollectorError, Result};

/// Daily weather summary payload as returned by the weather endpoint.
/// Sections are optional so a sparse response degrades to empty columns
/// instead of failing the row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySummary {
    pub cloud_cover: Option<CloudCoverSection>,
    pub humidity: Option<HumiditySection>,
    pub precipitation: Option<PrecipitationSection>,
    pub temperature: Option<TemperatureSection>,
    pub pressure: Option<PressureSection>,
    pub wind: Option<WindSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudCoverSection {
    pub afternoon: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HumiditySection {
    pub afternoon: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrecipitationSection {
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemperatureSection {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub morning: Option<f64>,
    pub afternoon: Option<f64>,
    pub evening: Option<f64>,
    pub night: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PressureSection {
    pub afternoon: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindSection {
    pub max: Option<WindMax>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WindMax {
    pub speed: Option<f64>,
    pub direction: Option<f64>,
}

/// Error body returned by the weather endpoint on non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}

/// One raw fetch result: the (coordinate, date) key plus the unflattened
/// payload. Flattening into named columns is a separate pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub latitude: f64,
    pub longitude: f64,
    pub date: NaiveDate,
    pub summary: DaySummary,
}

/// Flattened weather row with named scalar columns, metric units as
/// returned upstream.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct WeatherRecord {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    pub date: NaiveDate,

    #[validate(range(min = 0.0, max = 100.0))]
    pub cloud_cover_pct: Option<f64>,

    #[validate(range(min = 0.0, max = 100.0))]
    pub humidity_pct: Option<f64>,

    #[validate(range(min = 0.0))]
    pub precipitation_mm: Option<f64>,

    #[validate(range(min = -50.0, max = 60.0))]
    pub temp_min_c: Option<f64>,

    #[validate(range(min = -50.0, max = 60.0))]
    pub temp_max_c: Option<f64>,

    #[validate(range(min = -50.0, max = 60.0))]
    pub temp_morning_c: Option<f64>,

    #[validate(range(min = -50.0, max = 60.0))]
    pub temp_afternoon_c: Option<f64>,

    #[validate(range(min = -50.0, max = 60.0))]
    pub temp_evening_c: Option<f64>,

    #[validate(range(min = -50.0, max = 60.0))]
    pub temp_night_c: Option<f64>,

    #[validate(range(min = 800.0, max = 1100.0))]
    pub pressure_hpa: Option<f64>,

    #[validate(range(min = 0.0))]
    pub wind_max_speed_ms: Option<f64>,

    #[validate(range(min = 0.0, max = 360.0))]
    pub wind_max_direction_deg: Option<f64>,
}

impl WeatherRecord {
    /// Flatten one raw observation into named scalar columns.
    pub fn from_observation(observation: &WeatherObservation) -> Self {
        let summary = &observation.summary;
        let temperature = summary.temperature.as_ref();
        let wind_max = summary.wind.as_ref().and_then(|w| w.max.as_ref());

        Self {
            latitude: observation.latitude,
            longitude: observation.longitude,
            date: observation.date,
            cloud_cover_pct: summary.cloud_cover.as_ref().and_then(|c| c.afternoon),
            humidity_pct: summary.humidity.as_ref().and_then(|h| h.afternoon),
            precipitation_mm: summary.precipitation.as_ref().and_then(|p| p.total),
            temp_min_c: temperature.and_then(|t| t.min),
            temp_max_c: temperature.and_then(|t| t.max),
            temp_morning_c: temperature.and_then(|t| t.morning),
            temp_afternoon_c: temperature.and_then(|t| t.afternoon),
            temp_evening_c: temperature.and_then(|t| t.evening),
            temp_night_c: temperature.and_then(|t| t.night),
            pressure_hpa: summary.pressure.as_ref().and_then(|p| p.afternoon),
            wind_max_speed_ms: wind_max.and_then(|w| w.speed),
            wind_max_direction_deg: wind_max.and_then(|w| w.direction),
        }
    }

    pub fn flatten_all(observations: &[WeatherObservation]) -> Vec<WeatherRecord> {
        observations.iter().map(Self::from_observation).collect()
    }

    /// Cross-field consistency plus the derived range checks. The API
    /// occasionally reports min/max swapped by a fraction of a degree,
    /// so the relationship check carries a tolerance.
    pub fn validate_relationships(&self) -> Result<()> {
        if let (Some(min), Some(max)) = (self.temp_min_c, self.temp_max_c) {
            let tolerance = 1.0;

            if min > max + tolerance {
                return Err(CollectorError::WeatherValidation {
                    message: format!(
                        "Min temperature {} > Max temperature {} (tolerance={})",
                        min, max, tolerance
                    ),
                });
            }
        }

        self.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAYLOAD: &str = r#"{
        "cloud_cover": {"afternoon": 12.0},
        "humidity": {"afternoon": 23.0},
        "precipitation": {"total": 0.4},
        "temperature": {
            "min": 21.3, "max": 38.9,
            "morning": 24.0, "afternoon": 37.5, "evening": 33.1, "night": 26.2
        },
        "pressure": {"afternoon": 1007.0},
        "wind": {"max": {"speed": 8.2, "direction": 340.0}}
    }"#;

    fn observation(summary: DaySummary) -> WeatherObservation {
        WeatherObservation {
            latitude: 15.5007,
            longitude: 32.5599,
            date: NaiveDate::from_ymd_opt(2022, 6, 15).unwrap(),
            summary,
        }
    }

    #[test]
    fn test_flatten_full_payload() {
        let summary: DaySummary = serde_json::from_str(FULL_PAYLOAD).unwrap();
        let record = WeatherRecord::from_observation(&observation(summary));

        assert_eq!(record.cloud_cover_pct, Some(12.0));
        assert_eq!(record.humidity_pct, Some(23.0));
        assert_eq!(record.precipitation_mm, Some(0.4));
        assert_eq!(record.temp_min_c, Some(21.3));
        assert_eq!(record.temp_max_c, Some(38.9));
        assert_eq!(record.temp_morning_c, Some(24.0));
        assert_eq!(record.temp_afternoon_c, Some(37.5));
        assert_eq!(record.temp_evening_c, Some(33.1));
        assert_eq!(record.temp_night_c, Some(26.2));
        assert_eq!(record.pressure_hpa, Some(1007.0));
        assert_eq!(record.wind_max_speed_ms, Some(8.2));
        assert_eq!(record.wind_max_direction_deg, Some(340.0));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_flatten_sparse_payload() {
        let summary: DaySummary =
            serde_json::from_str(r#"{"temperature": {"min": 20.0}}"#).unwrap();
        let record = WeatherRecord::from_observation(&observation(summary));

        assert_eq!(record.temp_min_c, Some(20.0));
        assert_eq!(record.temp_max_c, None);
        assert_eq!(record.cloud_cover_pct, None);
        assert_eq!(record.wind_max_speed_ms, None);
    }

    #[test]
    fn test_validation_rejects_bad_humidity() {
        let summary: DaySummary =
            serde_json::from_str(r#"{"humidity": {"afternoon": 130.0}}"#).unwrap();
        let record = WeatherRecord::from_observation(&observation(summary));

        assert!(record.validate().is_err());
    }

    #[test]
    fn test_temperature_relationship_tolerance() {
        let swapped: DaySummary =
            serde_json::from_str(r#"{"temperature": {"min": 30.5, "max": 30.0}}"#).unwrap();
        let record = WeatherRecord::from_observation(&observation(swapped));
        // Within the one-degree tolerance
        assert!(record.validate_relationships().is_ok());

        let inverted: DaySummary =
            serde_json::from_str(r#"{"temperature": {"min": 35.0, "max": 20.0}}"#).unwrap();
        let record = WeatherRecord::from_observation(&observation(inverted));
        assert!(matches!(
            record.validate_relationships(),
            Err(CollectorError::WeatherValidation { .. })
        ));
    }

    #[test]
    fn test_error_body_message() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"cod": 401, "message": "Invalid API key"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("Invalid API key"));
    }
}
