//! Keeps the vector store in step with the corpus.
//!
//! Chunks get deterministic ids from their source, page and position, so a
//! second ingestion over the same files maps onto the ids already stored and
//! only genuinely new chunks are embedded.

mod ids;

use std::collections::HashSet;

pub use ids::{Chunk, IdStrategy, assign_chunk_ids};

use crate::store::{StoreError, VectorStore};

/// Outcome of one ingestion run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Chunks offered to the indexer
    pub total: usize,
    /// Chunks whose id was already stored
    pub existing: usize,
    /// Repeats of an id earlier in the same batch
    pub duplicates: usize,
    /// Chunks written in this run
    pub added: usize,
}

/// Write the chunks whose ids the store has not seen yet.
///
/// The existing ids are read once up front; at most one `add` call follows.
/// Store errors are returned as-is, nothing is retried.
pub async fn index_chunks(
    store: &dyn VectorStore,
    chunks: Vec<Chunk>,
) -> Result<IngestReport, StoreError> {
    let existing_ids = store.existing_ids().await?;
    tracing::info!("Existing chunks in store: {}", existing_ids.len());

    let mut report = IngestReport {
        total: chunks.len(),
        ..Default::default()
    };

    let mut batch_ids = HashSet::new();
    let mut new_chunks = Vec::new();
    for chunk in chunks {
        if existing_ids.contains(&chunk.id) {
            report.existing += 1;
        } else if !batch_ids.insert(chunk.id.clone()) {
            tracing::warn!("Duplicate chunk id in batch: {}", chunk.id);
            report.duplicates += 1;
        } else {
            new_chunks.push(chunk);
        }
    }

    if new_chunks.is_empty() {
        tracing::info!("No new chunks to add");
        return Ok(report);
    }

    tracing::info!("Adding {} new chunks", new_chunks.len());
    let new_ids: Vec<String> = new_chunks.iter().map(|c| c.id.clone()).collect();
    store.add(&new_chunks, &new_ids).await?;
    report.added = new_chunks.len();

    Ok(report)
}
