//! Vector store abstraction and the SQLite-backed implementation used by the CLI.

mod local;

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use thiserror::Error;

pub use local::LocalVectorStore;

use crate::index::Chunk;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on vector store at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Vector store database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Got {ids} ids for {chunks} chunks")]
    IdCountMismatch { ids: usize, chunks: usize },
}

/// A stored chunk returned by similarity search
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk: Chunk,
    /// Cosine similarity, higher is closer
    pub score: f32,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Every id currently stored. Only ids are read, not embeddings.
    async fn existing_ids(&self) -> Result<HashSet<String>, StoreError>;

    /// Embed and store `chunks` under the matching `ids`, replacing any
    /// record that already has one of those ids.
    async fn add(&self, chunks: &[Chunk], ids: &[String]) -> Result<(), StoreError>;

    /// The `k` stored chunks closest to `query`, best first
    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>, StoreError>;

    async fn count(&self) -> Result<usize, StoreError>;
}
