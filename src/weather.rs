//! Client for daily historical weather from a WeatherAPI-compatible upstream.

use chrono::NaiveDate;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::WeatherConfig;

/// Weather summary for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub location: String,
    pub region: Option<String>,
    pub avg_temp_c: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub total_precip_mm: Option<f64>,
    pub max_wind_kph: Option<f64>,
}

/// Why a day is missing from a report
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DayFailureReason {
    #[error("request failed: {0}")]
    Request(String),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    InvalidBody(String),

    #[error("response has no forecast for the day")]
    MissingForecast,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayFailure {
    pub date: NaiveDate,
    pub reason: DayFailureReason,
}

/// Days that were fetched, plus the days that were not and why
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReport {
    pub records: Vec<DailyWeather>,
    pub failures: Vec<DayFailure>,
}

impl WeatherReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Deserialize)]
struct HistoryResponse {
    location: Option<UpstreamLocation>,
    forecast: Option<Forecast>,
}

#[derive(Deserialize)]
struct UpstreamLocation {
    region: Option<String>,
}

#[derive(Deserialize)]
struct Forecast {
    #[serde(default)]
    forecastday: Vec<ForecastDay>,
}

#[derive(Deserialize)]
struct ForecastDay {
    day: DaySummary,
}

#[derive(Deserialize)]
struct DaySummary {
    avgtemp_c: Option<f64>,
    avghumidity: Option<f64>,
    totalprecip_mm: Option<f64>,
    maxwind_kph: Option<f64>,
}

pub struct WeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            client: Client::new(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch each day from `start` to `end` inclusive, one request at a time.
    ///
    /// A day that cannot be fetched is logged and listed in the report's
    /// failures; the remaining days are still requested.
    pub async fn get_weather_data(
        &self,
        location: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> WeatherReport {
        let mut report = WeatherReport::default();
        let mut date = start;

        while date <= end {
            match self.fetch_day(location, date).await {
                Ok(record) => report.records.push(record),
                Err(reason) => {
                    tracing::warn!("No weather data for {}: {}", date, reason);
                    report.failures.push(DayFailure { date, reason });
                }
            }

            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        report
    }

    async fn fetch_day(
        &self,
        location: &str,
        date: NaiveDate,
    ) -> Result<DailyWeather, DayFailureReason> {
        let dt = date.format("%Y-%m-%d").to_string();
        tracing::debug!("Fetching weather for {} on {}", location, dt);

        let response = self
            .client
            .get(format!("{}/history.json", self.base_url))
            .query(&[("key", self.api_key.as_str()), ("q", location), ("dt", dt.as_str())])
            .send()
            .await
            .map_err(|e| DayFailureReason::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DayFailureReason::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| DayFailureReason::Request(e.to_string()))?;

        parse_history(&body, location, date)
    }
}

fn parse_history(
    body: &str,
    location: &str,
    date: NaiveDate,
) -> Result<DailyWeather, DayFailureReason> {
    let history: HistoryResponse =
        serde_json::from_str(body).map_err(|e| DayFailureReason::InvalidBody(e.to_string()))?;

    let day = history
        .forecast
        .and_then(|f| f.forecastday.into_iter().next())
        .map(|d| d.day)
        .ok_or(DayFailureReason::MissingForecast)?;

    Ok(DailyWeather {
        date,
        location: location.to_string(),
        region: history.location.and_then(|l| l.region),
        avg_temp_c: day.avgtemp_c,
        avg_humidity: day.avghumidity,
        total_precip_mm: day.totalprecip_mm,
        max_wind_kph: day.maxwind_kph,
    })
}
