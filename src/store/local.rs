use async_trait::async_trait;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use super::{SearchHit, StoreError, VectorStore};
use crate::index::Chunk;
use crate::llm::Embedder;
use crate::parser::DocumentMetadata;

const DATABASE_FILE: &str = "chunks.db";
/// Texts sent to the embedder per request
const EMBED_BATCH: usize = 32;

/// A vector store kept in a SQLite database inside a directory.
///
/// Ids, text and metadata are columns; embeddings are little-endian `f32`
/// blobs scored by brute-force cosine similarity. Every call goes to the
/// database, so a long-running server sees rows written by another process.
pub struct LocalVectorStore {
    pool: SqlitePool,
    embedder: Arc<dyn Embedder>,
}

impl LocalVectorStore {
    /// Open (or create) the store in `dir`
    pub async fn open(
        dir: impl AsRef<Path>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, e))?;

        let options = SqliteConnectOptions::new()
            .filename(dir.join(DATABASE_FILE))
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .min_connections(1)
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool, embedder };
        store.init_schema().await?;
        store.check_embedding_model().await?;
        Ok(store)
    }

    /// Delete a persisted store directory. Returns whether anything was removed.
    pub async fn clear(dir: &Path) -> Result<bool, StoreError> {
        if !tokio::fs::try_exists(dir).await.map_err(|e| io_error(dir, e))? {
            return Ok(false);
        }
        tokio::fs::remove_dir_all(dir)
            .await
            .map_err(|e| io_error(dir, e))?;
        Ok(true)
    }

    async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS chunks (
                id TEXT PRIMARY KEY,
                content TEXT NOT NULL,
                source TEXT NOT NULL,
                page INTEGER NOT NULL,
                embedding BLOB NOT NULL,
                model TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn check_embedding_model(&self) -> Result<(), StoreError> {
        let other: Option<String> =
            sqlx::query_scalar("SELECT model FROM chunks WHERE model != ?1 LIMIT 1")
                .bind(self.embedder.model())
                .fetch_optional(&self.pool)
                .await?;

        if let Some(model) = other {
            tracing::warn!(
                "Store holds embeddings from model '{}' but '{}' is configured. Run ingest with --reset to rebuild it.",
                model,
                self.embedder.model()
            );
        }
        Ok(())
    }

    async fn embed_all(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, StoreError> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBED_BATCH) {
            let vectors = self
                .embedder
                .embed(batch)
                .await
                .map_err(|e| StoreError::Embedding(format!("{:#}", e)))?;
            if vectors.len() != batch.len() {
                return Err(StoreError::Embedding(format!(
                    "expected {} vectors, got {}",
                    batch.len(),
                    vectors.len()
                )));
            }
            embeddings.extend(vectors);
            tracing::debug!("Embedded {}/{} chunks", embeddings.len(), texts.len());
        }
        Ok(embeddings)
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn existing_ids(&self) -> Result<HashSet<String>, StoreError> {
        let ids: Vec<String> = sqlx::query_scalar("SELECT id FROM chunks")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids.into_iter().collect())
    }

    async fn add(&self, chunks: &[Chunk], ids: &[String]) -> Result<(), StoreError> {
        if chunks.len() != ids.len() {
            return Err(StoreError::IdCountMismatch {
                ids: ids.len(),
                chunks: chunks.len(),
            });
        }
        if chunks.is_empty() {
            return Ok(());
        }

        let texts = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embed_all(texts).await?;

        let mut tx = self.pool.begin().await?;
        for ((chunk, id), embedding) in chunks.iter().zip(ids).zip(&embeddings) {
            sqlx::query(
                "INSERT INTO chunks (id, content, source, page, embedding, model)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(id) DO UPDATE SET
                    content = excluded.content,
                    source = excluded.source,
                    page = excluded.page,
                    embedding = excluded.embedding,
                    model = excluded.model",
            )
            .bind(id)
            .bind(&chunk.content)
            .bind(&chunk.metadata.source)
            .bind(i64::from(chunk.metadata.page))
            .bind(encode_embedding(embedding))
            .bind(self.embedder.model())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        tracing::debug!("Upserted {} chunks", chunks.len());
        Ok(())
    }

    async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>, StoreError> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let rows = sqlx::query("SELECT id, content, source, page, embedding FROM chunks")
            .fetch_all(&self.pool)
            .await?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embed_all(vec![query.to_string()])
            .await?
            .pop()
            .unwrap_or_default();

        let mut hits = Vec::with_capacity(rows.len());
        for row in &rows {
            let (chunk, embedding) = row_to_chunk(row)?;
            hits.push(SearchHit {
                score: cosine_similarity(&query_embedding, &embedding),
                chunk,
            });
        }

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);
        Ok(hits)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

fn row_to_chunk(row: &SqliteRow) -> Result<(Chunk, Vec<f32>), StoreError> {
    let page: i64 = row.try_get("page")?;
    let blob: Vec<u8> = row.try_get("embedding")?;
    let chunk = Chunk {
        id: row.try_get("id")?,
        content: row.try_get("content")?,
        metadata: DocumentMetadata {
            source: row.try_get("source")?,
            page: u32::try_from(page).unwrap_or_default(),
        },
    };
    Ok((chunk, decode_embedding(&blob)))
}

fn encode_embedding(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

fn decode_embedding(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
