use anyhow::{Context, Result};
use chrono::NaiveDate;
use console::{Emoji, style};
use std::path::PathBuf;

use super::load_config;
use crate::weather::WeatherClient;

static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

pub async fn run(
    location: Option<String>,
    start: NaiveDate,
    end: NaiveDate,
    output: Option<PathBuf>,
) -> Result<()> {
    let config = load_config()?;
    let location = location.unwrap_or_else(|| config.weather.default_location.clone());
    if start > end {
        anyhow::bail!("--start ({}) is after --end ({})", start, end);
    }

    let client = WeatherClient::new(&config.weather);
    let report = client.get_weather_data(&location, start, end).await;

    if !report.is_complete() {
        for failure in &report.failures {
            eprintln!("{}{}: {}", WARN, failure.date, failure.reason);
        }
        eprintln!(
            "  {} of {} days could not be fetched",
            style(report.failures.len()).yellow().bold(),
            report.records.len() + report.failures.len()
        );
    }

    let json = serde_json::to_string_pretty(&report.records)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{}Wrote {} days to {}",
                CHECK,
                style(report.records.len()).green().bold(),
                style(path.display()).cyan()
            );
        }
        None => println!("{}", json),
    }

    Ok(())
}
