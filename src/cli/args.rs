use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::DEFAULT_STRIDE_DAYS;

#[derive(Parser)]
#[command(name = "sudan-geodata")]
#[command(about = "Weather and road-infrastructure data collector for Sudanese regions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Settings file path")]
    pub settings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch daily weather summaries for every region centroid
    Weather {
        #[arg(short, long, help = "Boundary file (.geojson or .shp)")]
        boundaries: PathBuf,

        #[arg(long, help = "First sampled date (YYYY-MM-DD)")]
        start_date: NaiveDate,

        #[arg(long, help = "Last sampled date, inclusive (YYYY-MM-DD)")]
        end_date: NaiveDate,

        #[arg(long, default_value_t = DEFAULT_STRIDE_DAYS)]
        stride_days: i64,

        #[arg(long, help = "UTC offset sent to the API [default: from settings]")]
        timezone: Option<String>,

        #[arg(long, help = "API key (prompted interactively when omitted)")]
        api_key: Option<String>,

        #[arg(
            short,
            long,
            help = "Output CSV path [default: output/sudan-weather-{YYMMDD}.csv]"
        )]
        output: Option<PathBuf>,
    },

    /// Fetch OSM road/rail/waterway elements for every region bounding box
    Osm {
        #[arg(short, long, help = "Boundary file (.geojson or .shp)")]
        boundaries: PathBuf,

        #[arg(
            short,
            long,
            help = "Output JSON path [default: output/sudan-osm-{YYMMDD}.json]"
        )]
        output: Option<PathBuf>,
    },

    /// Merge the weather table onto the boundary table and export
    Export {
        #[arg(short, long, help = "Boundary file (.geojson or .shp)")]
        boundaries: PathBuf,

        #[arg(short, long, help = "Weather CSV produced by the weather command")]
        weather: PathBuf,

        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        #[arg(
            long,
            value_delimiter = ',',
            default_value = "csv,json,geojson,shapefile",
            help = "Formats to export"
        )]
        formats: Vec<String>,
    },

    /// Display information about a boundary file
    Info {
        #[arg(short, long, help = "Boundary file (.geojson or .shp)")]
        boundaries: PathBuf,

        #[arg(short, long, default_value = "5")]
        sample: usize,
    },
}
