use chrono::{Datelike, Local};
use std::path::PathBuf;

/// Dated file name: sudan-{stem}-{YYMMDD}.{ext}
pub fn dated_filename(stem: &str, extension: &str) -> String {
    let now = Local::now();
    let year = now.year() % 100;
    let month = now.month();
    let day = now.day();

    format!(
        "sudan-{}-{:02}{:02}{:02}.{}",
        stem, year, month, day, extension
    )
}

/// Generate a dated default output path: output/sudan-{stem}-{YYMMDD}.{ext}
pub fn default_output_path(stem: &str, extension: &str) -> PathBuf {
    PathBuf::from("output").join(dated_filename(stem, extension))
}
