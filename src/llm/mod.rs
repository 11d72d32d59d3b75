mod ollama;
pub mod prompts;

use anyhow::Result;
use async_trait::async_trait;

pub use ollama::OllamaProvider;

/// A text-in, text-out language model
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete a single prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the provider name
    fn name(&self) -> &'static str;
}

/// Turns texts into embedding vectors, one per input, in input order
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Model name recorded alongside stored embeddings
    fn model(&self) -> &str;
}
