use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::parser::{Document, DocumentMetadata};

/// A split document with its stable `source:page:index` id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub content: String,
    pub metadata: DocumentMetadata,
}

/// How the per-page index of a chunk is derived
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Count chunks per page key across the whole batch. Ids stay unique
    /// even when chunks of one page are interleaved with other pages.
    #[default]
    Grouped,
    /// Restart the index whenever the page key differs from the previous
    /// chunk. Only unique when every page's chunks are contiguous.
    Contiguous,
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Grouped => write!(f, "grouped"),
            IdStrategy::Contiguous => write!(f, "contiguous"),
        }
    }
}

/// Give every chunk an id of the form `{source}:{page}:{index}`.
///
/// Both strategies agree on page-contiguous input, which is what the
/// splitter produces, so a store built with one stays valid under the other.
pub fn assign_chunk_ids(chunks: Vec<Document>, strategy: IdStrategy) -> Vec<Chunk> {
    match strategy {
        IdStrategy::Grouped => grouped_ids(chunks),
        IdStrategy::Contiguous => contiguous_ids(chunks),
    }
}

fn grouped_ids(chunks: Vec<Document>) -> Vec<Chunk> {
    let mut next_index: HashMap<String, usize> = HashMap::new();

    chunks
        .into_iter()
        .map(|doc| {
            let page_id = doc.metadata.page_key();
            let counter = next_index.entry(page_id.clone()).or_insert(0);
            let id = format!("{}:{}", page_id, counter);
            *counter += 1;
            into_chunk(doc, id)
        })
        .collect()
}

fn contiguous_ids(chunks: Vec<Document>) -> Vec<Chunk> {
    let mut last_page_id: Option<String> = None;
    let mut current_chunk_index = 0;

    chunks
        .into_iter()
        .map(|doc| {
            let current_page_id = doc.metadata.page_key();
            if last_page_id.as_deref() == Some(current_page_id.as_str()) {
                current_chunk_index += 1;
            } else {
                current_chunk_index = 0;
            }
            let id = format!("{}:{}", current_page_id, current_chunk_index);
            last_page_id = Some(current_page_id);
            into_chunk(doc, id)
        })
        .collect()
}

fn into_chunk(doc: Document, id: String) -> Chunk {
    Chunk {
        id,
        content: doc.content,
        metadata: doc.metadata,
    }
}
