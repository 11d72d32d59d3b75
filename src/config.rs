use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::index::IdStrategy;

/// Environment variable that points at an alternative configuration file
pub const CONFIG_ENV: &str = "AGRORAG_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
    pub weather: WeatherConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_store_dir() -> PathBuf {
    PathBuf::from("store")
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_top_k() -> usize {
    3
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestConfig {
    #[serde(default)]
    pub id_strategy: IdStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_model")]
    pub embedding_model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_url(),
            model: default_model(),
            embedding_model: default_model(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "mistral".to_string()
}

/// Settings for the historical weather upstream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    pub default_location: String,
    /// First day of the window used by queries; defaults to a week back from today
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Days in the default query-time weather window
const WINDOW_DAYS: i64 = 7;

fn default_weather_url() -> String {
    "http://api.weatherapi.com/v1".to_string()
}

impl WeatherConfig {
    /// Inclusive date window for query-time weather lookups.
    ///
    /// A single configured date anchors a seven-day window on that side;
    /// with neither set the window is the week ending `today`.
    pub fn window(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let week = chrono::Duration::days(WINDOW_DAYS - 1);
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => (start, end),
            (Some(start), None) => (start, start + week),
            (None, Some(end)) => (end - week, end),
            (None, None) => (today - week, today),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            store_dir: default_store_dir(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            top_k: default_top_k(),
            ingest: IngestConfig::default(),
            ollama: OllamaConfig::default(),
            weather: WeatherConfig {
                api_key: "${WEATHER_API_KEY}".to_string(),
                base_url: default_weather_url(),
                default_location: "Curitiba".to_string(),
                start_date: None,
                end_date: None,
            },
        }
    }
}

impl Config {
    /// Get the configuration directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("agrorag");
        Ok(config_dir)
    }

    /// Get the configuration file path, honouring `AGRORAG_CONFIG`
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            if !path.is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            anyhow::bail!(
                "Configuration file not found at {}. Run 'agrorag init' first.",
                config_path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file at {}", config_path.display()))
    }

    fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.expand_env_vars();
        Ok(config)
    }

    /// Expand environment variables in secret values
    fn expand_env_vars(&mut self) {
        self.weather.api_key = expand_env_var(&self.weather.api_key);
    }
}

/// Expand environment variable references like ${VAR_NAME}
fn expand_env_var(value: &str) -> String {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_default()
    } else {
        value.to_string()
    }
}
