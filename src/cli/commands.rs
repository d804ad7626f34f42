use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::{warn, Level};

use crate::cli::args::{Cli, Commands};
use crate::config::CollectorSettings;
use crate::error::{CollectorError, Result};
use crate::fetchers::{OsmFetcher, SampleRange, WeatherFetcher};
use crate::models::{Region, WeatherRecord};
use crate::processors::RecordMerger;
use crate::readers::{count_missing_centroids, BoundaryReader, WeatherReader};
use crate::utils::constants::{
    FORMAT_CSV, FORMAT_GEOJSON, FORMAT_JSON, FORMAT_SHAPEFILE, OSM_WAY_TAGS,
};
use crate::utils::filename::{dated_filename, default_output_path};
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, GeoJsonWriter, JsonWriter, ShapefileWriter};

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.verbose, cli.log_file.as_deref())?;

    let settings = CollectorSettings::load_from(cli.settings.as_deref())?;

    match cli.command {
        Commands::Weather {
            boundaries,
            start_date,
            end_date,
            stride_days,
            timezone,
            api_key,
            output,
        } => {
            println!("Collecting weather data...");
            println!("Boundaries: {}", boundaries.display());

            let regions = load_regions(&boundaries)?;

            let api_key = match api_key {
                Some(key) => key,
                None => rpassword::prompt_password("OpenWeatherMap API key: ")?,
            };

            let range = SampleRange::new(start_date, end_date, stride_days)?;
            let timezone = timezone.unwrap_or_else(|| settings.timezone.clone());
            let fetcher = WeatherFetcher::new(&settings, api_key).with_timezone(timezone);

            let with_centroid = regions.iter().filter(|r| r.has_centroid()).count();
            let total_requests = (with_centroid * range.request_count()) as u64;
            println!(
                "{} sampled dates x {} regions = {} requests",
                range.request_count(),
                with_centroid,
                total_requests
            );

            let progress = ProgressReporter::new(total_requests, "Fetching weather...", false);
            let (observations, summary) = fetcher.fetch_all(&regions, &range, Some(&progress)).await;
            progress.finish_with_message("Weather collection complete");

            let records = WeatherRecord::flatten_all(&observations);

            // Suspect rows are kept as returned by the API, just reported
            let suspect = records
                .iter()
                .filter(|record| {
                    if let Err(error) = record.validate_relationships() {
                        warn!(date = %record.date, %error, "suspect weather row");
                        return true;
                    }
                    false
                })
                .count();

            let output = output.unwrap_or_else(|| default_output_path("weather", "csv"));
            CsvWriter::new().write_weather_records(&records, &output)?;

            println!("\n{}", summary.summary());
            if suspect > 0 {
                println!("{} rows failed range checks (kept, see log)", suspect);
            }
            println!("Wrote {} weather rows to {}", records.len(), output.display());
        }

        Commands::Osm { boundaries, output } => {
            println!("Collecting OSM infrastructure data...");
            println!("Boundaries: {}", boundaries.display());

            let regions = load_regions(&boundaries)?;
            let fetcher = OsmFetcher::new(&settings);

            let progress =
                ProgressReporter::new(regions.len() as u64, "Fetching OSM elements...", false);
            // Any Overpass failure aborts the run
            let sets = fetcher.fetch_all(&regions, Some(&progress)).await?;
            progress.finish_with_message("OSM collection complete");

            let total_elements: usize = sets.iter().map(|s| s.elements.len()).sum();
            let output = output.unwrap_or_else(|| default_output_path("osm", "json"));
            JsonWriter::new().write_element_sets(&sets, &output)?;

            let mut kind_totals: HashMap<&str, usize> = HashMap::new();
            for set in &sets {
                for (kind, count) in set.counts_by_kind() {
                    *kind_totals.entry(kind).or_insert(0) += count;
                }
            }
            for tag in OSM_WAY_TAGS {
                println!("  {} ways: {}", tag, kind_totals.get(tag).copied().unwrap_or(0));
            }

            println!(
                "Wrote {} element sets ({} elements) to {}",
                sets.len(),
                total_elements,
                output.display()
            );
        }

        Commands::Export {
            boundaries,
            weather,
            output_dir,
            formats,
        } => {
            println!("Merging and exporting...");
            println!("Boundaries: {}", boundaries.display());
            println!("Weather table: {}", weather.display());

            let regions = load_regions(&boundaries)?;
            let weather_records = WeatherReader::new().read_records(&weather)?;

            let progress = ProgressReporter::new_spinner("Merging tables...", false);
            let (merged, summary) = RecordMerger::new().merge(&regions, &weather_records)?;
            progress.finish_with_message("Merge complete");
            println!("{}", summary.summary());

            for format in &formats {
                let path = match format.as_str() {
                    FORMAT_CSV => {
                        let path = output_dir.join(dated_filename("merged", "csv"));
                        CsvWriter::new().write_merged_records(&merged, &path)?;
                        path
                    }
                    FORMAT_JSON => {
                        let path = output_dir.join(dated_filename("merged", "json"));
                        JsonWriter::new().write_merged_records(&merged, &path)?;
                        path
                    }
                    FORMAT_GEOJSON => {
                        let path = output_dir.join(dated_filename("merged", "geojson"));
                        GeoJsonWriter::new().write(&regions, &merged, &path)?;
                        path
                    }
                    FORMAT_SHAPEFILE => {
                        let path = output_dir.join(dated_filename("merged", "shp"));
                        ShapefileWriter::new().write(&regions, &merged, &path)?;
                        path
                    }
                    other => {
                        return Err(CollectorError::InvalidArgument(format!(
                            "unknown export format '{}'",
                            other
                        )))
                    }
                };
                println!("Wrote {}", path.display());
            }

            println!("Export complete!");
        }

        Commands::Info { boundaries, sample } => {
            println!("Analyzing boundary file: {}", boundaries.display());

            let regions = load_regions(&boundaries)?;
            let skipped = count_missing_centroids(&regions);

            println!("\nRegions: {}", regions.len());
            println!("Invalid geometries (no centroid): {}", skipped);

            if let Some(bounds) = dataset_bounds(&regions) {
                println!(
                    "Bounds: lat [{:.4}, {:.4}], lon [{:.4}, {:.4}]",
                    bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon
                );
            }

            let outside = regions
                .iter()
                .filter(|r| r.has_centroid() && !r.is_within_sudan_bounds())
                .count();
            if outside > 0 {
                println!("Centroids outside Sudan bounds: {}", outside);
            }

            if sample > 0 {
                println!("\nSample regions (showing up to {}):", sample);
                for (i, region) in regions.iter().take(sample).enumerate() {
                    match (region.centroid_lat(), region.centroid_lon()) {
                        (Some(lat), Some(lon)) => println!(
                            "{}. {} ({}) centroid ({:.4}, {:.4})",
                            i + 1,
                            region.name(),
                            region.code(),
                            lat,
                            lon
                        ),
                        _ => println!(
                            "{}. {} ({}) [invalid geometry]",
                            i + 1,
                            region.name(),
                            region.code()
                        ),
                    }
                }
            }
        }
    }

    Ok(())
}

fn load_regions(boundaries: &Path) -> Result<Vec<Region>> {
    let regions = BoundaryReader::new().read_regions(boundaries)?;
    let skipped = count_missing_centroids(&regions);
    println!(
        "Loaded {} regions ({} with invalid geometry)",
        regions.len(),
        skipped
    );
    Ok(regions)
}

fn dataset_bounds(regions: &[Region]) -> Option<crate::utils::geometry::BoundingBox> {
    regions
        .iter()
        .filter_map(|region| region.bounding_box().ok())
        .reduce(|acc, bbox| acc.union(&bbox))
}

fn init_tracing(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_max_level(level)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_max_level(level).init();
        }
    }

    Ok(())
}
