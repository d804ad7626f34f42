use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::region::Region;
use crate::models::weather::WeatherRecord;

/// The fixed export projection: region identifiers plus the coordinate
/// and one sampled date's weather columns. Boundary rows with no weather
/// match appear once with all weather fields empty (left join).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MergedRecord {
    pub country: String,
    pub state_code: String,
    pub state_name: String,
    pub district_code: Option<String>,
    pub district_name: Option<String>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,

    pub date: Option<NaiveDate>,

    pub cloud_cover_pct: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub temp_min_c: Option<f64>,
    pub temp_max_c: Option<f64>,
    pub temp_morning_c: Option<f64>,
    pub temp_afternoon_c: Option<f64>,
    pub temp_evening_c: Option<f64>,
    pub temp_night_c: Option<f64>,
    pub pressure_hpa: Option<f64>,
    pub wind_max_speed_ms: Option<f64>,
    pub wind_max_direction_deg: Option<f64>,
}

impl MergedRecord {
    /// Row for a boundary entry with no weather match.
    pub fn from_region(region: &Region) -> Self {
        Self {
            country: region.country.clone(),
            state_code: region.state_code.clone(),
            state_name: region.state_name.clone(),
            district_code: region.district_code.clone(),
            district_name: region.district_name.clone(),
            latitude: region.centroid_lat(),
            longitude: region.centroid_lon(),
            date: None,
            cloud_cover_pct: None,
            humidity_pct: None,
            precipitation_mm: None,
            temp_min_c: None,
            temp_max_c: None,
            temp_morning_c: None,
            temp_afternoon_c: None,
            temp_evening_c: None,
            temp_night_c: None,
            pressure_hpa: None,
            wind_max_speed_ms: None,
            wind_max_direction_deg: None,
        }
    }

    /// Row joining a boundary entry with one of its weather rows.
    pub fn with_weather(region: &Region, weather: &WeatherRecord) -> Self {
        let mut record = Self::from_region(region);
        record.date = Some(weather.date);
        record.cloud_cover_pct = weather.cloud_cover_pct;
        record.humidity_pct = weather.humidity_pct;
        record.precipitation_mm = weather.precipitation_mm;
        record.temp_min_c = weather.temp_min_c;
        record.temp_max_c = weather.temp_max_c;
        record.temp_morning_c = weather.temp_morning_c;
        record.temp_afternoon_c = weather.temp_afternoon_c;
        record.temp_evening_c = weather.temp_evening_c;
        record.temp_night_c = weather.temp_night_c;
        record.pressure_hpa = weather.pressure_hpa;
        record.wind_max_speed_ms = weather.wind_max_speed_ms;
        record.wind_max_direction_deg = weather.wind_max_direction_deg;
        record
    }

    pub fn has_weather(&self) -> bool {
        self.date.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{polygon, MultiPolygon};

    fn region() -> Region {
        Region::new(
            "Sudan".to_string(),
            "SDN.1_1".to_string(),
            "Blue Nile".to_string(),
            None,
            None,
            MultiPolygon::new(vec![polygon![
                (x: 33.0, y: 11.0),
                (x: 34.0, y: 11.0),
                (x: 34.0, y: 12.0),
                (x: 33.0, y: 11.0),
            ]]),
        )
    }

    #[test]
    fn test_from_region_has_empty_weather() {
        let record = MergedRecord::from_region(&region());

        assert_eq!(record.state_name, "Blue Nile");
        assert!(record.latitude.is_some());
        assert!(!record.has_weather());
        assert!(record.temp_max_c.is_none());
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_with_weather_carries_all_columns() {
        let region = region();
        let weather = WeatherRecord {
            latitude: region.centroid_lat().unwrap(),
            longitude: region.centroid_lon().unwrap(),
            date: NaiveDate::from_ymd_opt(2022, 3, 1).unwrap(),
            cloud_cover_pct: Some(5.0),
            humidity_pct: Some(18.0),
            precipitation_mm: Some(0.0),
            temp_min_c: Some(19.5),
            temp_max_c: Some(36.0),
            temp_morning_c: Some(22.0),
            temp_afternoon_c: Some(35.1),
            temp_evening_c: Some(30.4),
            temp_night_c: Some(24.8),
            pressure_hpa: Some(1010.0),
            wind_max_speed_ms: Some(6.1),
            wind_max_direction_deg: Some(15.0),
        };

        let record = MergedRecord::with_weather(&region, &weather);

        assert!(record.has_weather());
        assert_eq!(record.date, Some(weather.date));
        assert_eq!(record.temp_afternoon_c, Some(35.1));
        assert_eq!(record.wind_max_direction_deg, Some(15.0));
        assert!(record.validate().is_ok());
    }
}
