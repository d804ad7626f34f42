use chrono::NaiveDate;
use geo::{polygon, MultiPolygon};
use tempfile::TempDir;

use sudan_geodata::fetchers::SampleRange;
use sudan_geodata::models::{MergedRecord, Region, WeatherRecord};
use sudan_geodata::processors::RecordMerger;
use sudan_geodata::readers::{BoundaryReader, WeatherReader};
use sudan_geodata::writers::{CsvWriter, GeoJsonWriter, JsonWriter, ShapefileWriter};

fn test_region(state_code: &str, state_name: &str, x: f64, y: f64) -> Region {
    Region::new(
        "Sudan".to_string(),
        state_code.to_string(),
        state_name.to_string(),
        None,
        None,
        MultiPolygon::new(vec![polygon![
            (x: x, y: y),
            (x: x + 1.0, y: y),
            (x: x + 1.0, y: y + 1.0),
            (x: x, y: y + 1.0),
            (x: x, y: y),
        ]]),
    )
}

fn test_weather(region: &Region, day: u32) -> WeatherRecord {
    WeatherRecord {
        latitude: region.centroid_lat().unwrap(),
        longitude: region.centroid_lon().unwrap(),
        date: NaiveDate::from_ymd_opt(2022, 1, day).unwrap(),
        cloud_cover_pct: Some(8.0),
        humidity_pct: Some(21.0),
        precipitation_mm: Some(0.2),
        temp_min_c: Some(17.4),
        temp_max_c: Some(35.6),
        temp_morning_c: Some(20.1),
        temp_afternoon_c: Some(34.8),
        temp_evening_c: Some(29.9),
        temp_night_c: Some(22.5),
        pressure_hpa: Some(1011.0),
        wind_max_speed_ms: Some(7.3),
        wind_max_direction_deg: Some(45.0),
    }
}

#[test]
fn test_weather_table_round_trips_through_csv() {
    let region = test_region("SDN.8_1", "Khartoum", 32.0, 15.0);
    let records = vec![test_weather(&region, 1), test_weather(&region, 8)];

    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("weather.csv");

    CsvWriter::new()
        .write_weather_records(&records, &path)
        .unwrap();
    let reloaded = WeatherReader::new().read_records(&path).unwrap();

    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded[0].date, records[0].date);
    assert_eq!(reloaded[0].latitude, records[0].latitude);
    assert_eq!(reloaded[1].temp_afternoon_c, Some(34.8));
}

#[test]
fn test_merge_then_export_all_formats() {
    let khartoum = test_region("SDN.8_1", "Khartoum", 32.0, 15.0);
    let red_sea = test_region("SDN.13_1", "Red Sea", 36.0, 18.0);

    let weather = vec![test_weather(&khartoum, 1), test_weather(&khartoum, 8)];
    let regions = vec![khartoum, red_sea];

    let (merged, summary) = RecordMerger::new().merge(&regions, &weather).unwrap();

    // Left join: two weather rows for Khartoum, one empty row for Red Sea
    assert_eq!(merged.len(), 3);
    assert_eq!(summary.regions_matched, 1);
    assert_eq!(summary.regions_unmatched, 1);

    let dir = TempDir::new().expect("Failed to create temp directory");

    let csv_path = dir.path().join("merged.csv");
    CsvWriter::new()
        .write_merged_records(&merged, &csv_path)
        .unwrap();
    let csv_contents = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv_contents.lines().count(), 4); // header + 3 rows

    let json_path = dir.path().join("merged.json");
    JsonWriter::new()
        .write_merged_records(&merged, &json_path)
        .unwrap();
    let json_contents = std::fs::read_to_string(&json_path).unwrap();
    assert_eq!(json_contents.lines().count(), 3);

    let geojson_path = dir.path().join("merged.geojson");
    GeoJsonWriter::new()
        .write(&regions, &merged, &geojson_path)
        .unwrap();
    assert!(geojson_path.exists());

    let shp_path = dir.path().join("merged.shp");
    ShapefileWriter::new()
        .write(&regions, &merged, &shp_path)
        .unwrap();
    assert!(shp_path.exists());
    assert!(dir.path().join("merged.dbf").exists());
}

#[test]
fn test_geojson_export_reload_preserves_values_and_geometry() {
    let regions = vec![
        test_region("SDN.8_1", "Khartoum", 32.0, 15.0),
        test_region("SDN.13_1", "Red Sea", 36.0, 18.0),
    ];
    let merged: Vec<MergedRecord> = regions.iter().map(MergedRecord::from_region).collect();

    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("merged.geojson");
    GeoJsonWriter::new().write(&regions, &merged, &path).unwrap();

    let reloaded = BoundaryReader::new().read_regions(&path).unwrap();

    assert_eq!(reloaded.len(), regions.len());
    for (original, roundtripped) in regions.iter().zip(reloaded.iter()) {
        assert_eq!(original.state_code, roundtripped.state_code);
        assert_eq!(original.state_name, roundtripped.state_name);
        assert_eq!(original.country, roundtripped.country);
        // Geometry coordinates survive to source precision
        assert_eq!(original.rings, roundtripped.rings);
        assert!(
            (original.centroid_lat().unwrap() - roundtripped.centroid_lat().unwrap()).abs()
                < 1e-12
        );
    }
}

#[test]
fn test_shapefile_export_reloads_with_truncated_attributes() {
    let regions = vec![test_region("SDN.8_1", "Khartoum", 32.0, 15.0)];
    let weather = vec![test_weather(&regions[0], 1)];
    let (merged, _) = RecordMerger::new().merge(&regions, &weather).unwrap();

    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("merged.shp");
    ShapefileWriter::new().write(&regions, &merged, &path).unwrap();

    // No .prj sidecar is written; the reader assumes WGS84
    let reloaded = BoundaryReader::new().read_regions(&path).unwrap();

    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].state_code, "SDN.8_1");
    assert_eq!(reloaded[0].state_name, "Khartoum");
    assert!(reloaded[0].has_centroid());
}

#[test]
fn test_region_bounding_boxes_are_ordered() {
    let regions = vec![
        test_region("SDN.8_1", "Khartoum", 32.0, 15.0),
        test_region("SDN.13_1", "Red Sea", 36.0, 18.0),
    ];

    for region in &regions {
        let bbox = region.bounding_box().unwrap();
        assert!(bbox.min_lat <= bbox.max_lat);
        assert!(bbox.min_lon <= bbox.max_lon);
        assert!(bbox.contains(
            region.centroid_lat().unwrap(),
            region.centroid_lon().unwrap()
        ));
    }
}

#[test]
fn test_one_year_weekly_sampling_request_count() {
    let range = SampleRange::new(
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
        7,
    )
    .unwrap();

    assert_eq!(range.request_count(), 53);
}
