use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Embedder, LanguageModel};
use crate::config::OllamaConfig;

/// Chat completions and embeddings from a local Ollama server
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    embedding_model: String,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct OllamaEmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct OllamaEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaProvider {
    pub fn new(config: &OllamaConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // local models can be slow
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            embedding_model: config.embedding_model.clone(),
        }
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await
            .context(
                "Failed to send request to Ollama API. Is Ollama running? (try: ollama serve)",
            )?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Ollama API error ({}): {}", status, error_text);
        }

        Ok(response)
    }
}

#[async_trait]
impl LanguageModel for OllamaProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request = OllamaChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let response: OllamaChatResponse = self
            .post("/api/chat", &request)
            .await?
            .json()
            .await
            .context("Failed to parse Ollama chat response")?;

        Ok(response.message.content)
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}

#[async_trait]
impl Embedder for OllamaProvider {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = OllamaEmbedRequest {
            model: &self.embedding_model,
            input: texts,
        };

        let response: OllamaEmbedResponse = self
            .post("/api/embed", &request)
            .await?
            .json()
            .await
            .context("Failed to parse Ollama embed response")?;

        if response.embeddings.len() != texts.len() {
            anyhow::bail!(
                "Ollama returned {} embeddings for {} inputs",
                response.embeddings.len(),
                texts.len()
            );
        }

        Ok(response.embeddings)
    }

    fn model(&self) -> &str {
        &self.embedding_model
    }
}
