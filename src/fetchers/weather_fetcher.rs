use chrono::{Duration as ChronoDuration, NaiveDate};
use reqwest::Client;
use std::time::Duration;
use tracing::warn;

use crate::config::CollectorSettings;
use crate::error::{CollectorError, Result};
use crate::models::{ApiErrorBody, DaySummary, Region, WeatherObservation};
use crate::utils::progress::ProgressReporter;

/// Inclusive date range stepped by a fixed stride.
#[derive(Debug, Clone, Copy)]
pub struct SampleRange {
    start: NaiveDate,
    end: NaiveDate,
    stride_days: i64,
}

impl SampleRange {
    pub fn new(start: NaiveDate, end: NaiveDate, stride_days: i64) -> Result<Self> {
        if start > end {
            return Err(CollectorError::InvalidDateRange { start, end });
        }
        if stride_days < 1 {
            return Err(CollectorError::InvalidArgument(format!(
                "stride must be at least one day, got {}",
                stride_days
            )));
        }
        Ok(Self {
            start,
            end,
            stride_days,
        })
    }

    /// start, start+stride, ... up to and including end.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut date = self.start;
        while date <= self.end {
            dates.push(date);
            date += ChronoDuration::days(self.stride_days);
        }
        dates
    }

    pub fn request_count(&self) -> usize {
        self.dates().len()
    }
}

/// Outcome counters for one collection pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub regions_skipped: usize,
}

impl FetchSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} requests: {} succeeded, {} failed ({} regions without centroid skipped)",
            self.attempted, self.succeeded, self.failed, self.regions_skipped
        )
    }
}

/// Sequential per-centroid, per-date weather collector. One request in
/// flight at a time with a fixed pause after every request; a failed
/// request is a per-item event, logged and skipped.
pub struct WeatherFetcher {
    client: Client,
    endpoint: String,
    api_key: String,
    timezone: String,
    units: String,
    pause: Duration,
}

impl WeatherFetcher {
    pub fn new(settings: &CollectorSettings, api_key: String) -> Self {
        Self {
            client: Client::new(),
            endpoint: settings.weather_endpoint.clone(),
            api_key,
            timezone: settings.timezone.clone(),
            units: settings.units.clone(),
            pause: Duration::from_secs(settings.request_pause_secs),
        }
    }

    pub fn with_timezone(mut self, timezone: String) -> Self {
        self.timezone = timezone;
        self
    }

    /// One daily-summary request.
    pub async fn fetch_day(&self, lat: f64, lon: f64, date: NaiveDate) -> Result<DaySummary> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("date", date.format("%Y-%m-%d").to_string()),
                ("tz", self.timezone.clone()),
                ("appid", self.api_key.clone()),
                ("units", self.units.clone()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| "no message in error body".to_string());
            return Err(CollectorError::WeatherApi {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<DaySummary>().await?)
    }

    /// Collect raw observations for every region centroid over the range.
    pub async fn fetch_all(
        &self,
        regions: &[Region],
        range: &SampleRange,
        progress: Option<&ProgressReporter>,
    ) -> (Vec<WeatherObservation>, FetchSummary) {
        let dates = range.dates();
        let mut observations = Vec::new();
        let mut summary = FetchSummary::default();

        for region in regions {
            let (lat, lon) = match (region.centroid_lat(), region.centroid_lon()) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => {
                    summary.regions_skipped += 1;
                    continue;
                }
            };

            for date in &dates {
                summary.attempted += 1;

                match self.fetch_day(lat, lon, *date).await {
                    Ok(summary_payload) => {
                        observations.push(WeatherObservation {
                            latitude: lat,
                            longitude: lon,
                            date: *date,
                            summary: summary_payload,
                        });
                        summary.succeeded += 1;
                    }
                    Err(error) => {
                        summary.failed += 1;
                        warn!(region = region.code(), date = %date, %error, "weather request failed");
                        if let Some(p) = progress {
                            p.println(&format!("{} {}: {}", region.code(), date, error));
                        }
                    }
                }

                if let Some(p) = progress {
                    p.increment(1);
                }

                // Fixed pause after every request, success or failure
                tokio::time::sleep(self.pause).await;
            }
        }

        (observations, summary)
    }
}
