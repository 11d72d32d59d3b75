use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

use super::Document;

/// Each element of a top-level array becomes a document numbered from 1.
/// Any other top-level value is a single document.
pub fn load_documents(path: &Path) -> Result<Vec<Document>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file: {}", path.display()))?;

    let source = path.to_string_lossy().to_string();
    let records = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let text = serde_json::to_string(record)?;
            Ok(Document::new(text, source.clone(), i as u32 + 1))
        })
        .collect()
}
