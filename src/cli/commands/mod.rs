pub mod ingest;
pub mod init;
pub mod query;
pub mod serve;
pub mod weather;

use anyhow::{Context, Result};
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::llm::OllamaProvider;
use crate::query::QueryService;
use crate::store::LocalVectorStore;

fn load_config() -> Result<Config> {
    Config::load().context("Failed to load configuration. Run 'agrorag init' first.")
}

/// Store, model and weather client wired from the configuration
async fn query_service(config: &Config) -> Result<QueryService> {
    let ollama = Arc::new(OllamaProvider::new(&config.ollama));
    let store = LocalVectorStore::open(&config.store_dir, ollama.clone())
        .await
        .with_context(|| format!("Failed to open vector store at {}", config.store_dir.display()))?;
    Ok(QueryService::new(Arc::new(store), ollama, config.weather.clone()))
}

fn spinner(icon: &Emoji<'_, '_>, message: &'static str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner().template(&format!("{}{{spinner:.green}} {{msg}}", icon))?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    Ok(spinner)
}
