use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::config::WeatherConfig;
use crate::llm::LanguageModel;
use crate::llm::prompts::{NO_WEATHER_DATA, join_context, query_prompt};
use crate::store::{SearchHit, VectorStore};
use crate::weather::{WeatherClient, WeatherReport};

/// Everything that went into an answer, for callers that want to show it
#[derive(Debug)]
pub struct Answer {
    pub hits: Vec<SearchHit>,
    pub weather: WeatherReport,
    pub prompt: String,
    pub response: String,
}

/// Retrieval, weather lookup and generation for one question
pub struct QueryService {
    store: Arc<dyn VectorStore>,
    llm: Arc<dyn LanguageModel>,
    weather: WeatherClient,
    weather_config: WeatherConfig,
}

impl QueryService {
    pub fn new(
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LanguageModel>,
        weather_config: WeatherConfig,
    ) -> Self {
        Self {
            store,
            llm,
            weather: WeatherClient::new(&weather_config),
            weather_config,
        }
    }

    pub async fn answer(&self, question: &str, top_k: usize) -> Result<Answer> {
        let today = chrono::Local::now().date_naive();
        self.answer_on(question, top_k, today).await
    }

    /// Same as [`answer`](Self::answer) with the weather window anchored on `today`
    pub async fn answer_on(&self, question: &str, top_k: usize, today: NaiveDate) -> Result<Answer> {
        let hits = self
            .store
            .similarity_search_with_score(question, top_k)
            .await
            .context("Similarity search failed")?;
        tracing::info!("Retrieved {} chunks", hits.len());

        let contents: Vec<&str> = hits.iter().map(|h| h.chunk.content.as_str()).collect();
        let context = join_context(&contents);

        let (start, end) = self.weather_config.window(today);
        let weather = self
            .weather
            .get_weather_data(&self.weather_config.default_location, start, end)
            .await;
        let weather_text = format_weather(&weather)?;

        let prompt = query_prompt(&context, &weather_text, question);
        tracing::debug!("Invoking {} with {} prompt chars", self.llm.name(), prompt.len());
        let response = self
            .llm
            .generate(&prompt)
            .await
            .context("Language model call failed")?;

        Ok(Answer {
            hits,
            weather,
            prompt,
            response,
        })
    }
}

fn format_weather(report: &WeatherReport) -> Result<String> {
    if report.records.is_empty() {
        return Ok(NO_WEATHER_DATA.to_string());
    }
    Ok(serde_json::to_string_pretty(&report.records)?)
}
