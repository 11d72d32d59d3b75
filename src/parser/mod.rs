mod chunker;
mod json;
mod pdf;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub use chunker::TextChunker;

/// Where a piece of text came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: String,
    pub page: u32,
}

impl DocumentMetadata {
    /// `source:page` key shared by every chunk cut from the same page
    pub fn page_key(&self) -> String {
        format!("{}:{}", self.source, self.page)
    }
}

/// A page-level document, or a chunk of one after splitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(content: impl Into<String>, source: impl Into<String>, page: u32) -> Self {
        Self {
            content: content.into(),
            metadata: DocumentMetadata {
                source: source.into(),
                page,
            },
        }
    }
}

/// Loads the corpus from `<data_dir>/pdf` and `<data_dir>/json`
pub struct DocumentLoader {
    data_dir: PathBuf,
}

impl DocumentLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn pdf_dir(&self) -> PathBuf {
        self.data_dir.join("pdf")
    }

    pub fn json_dir(&self) -> PathBuf {
        self.data_dir.join("json")
    }

    /// One document per non-blank PDF page, zero-based page numbers
    pub fn load_pdf_documents(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for path in collect_files(&self.pdf_dir(), "pdf") {
            let source = path.to_string_lossy().to_string();
            for (page, text) in pdf::extract_pages(&path)?.into_iter().enumerate() {
                if text.trim().is_empty() {
                    continue;
                }
                documents.push(Document::new(text, source.clone(), page as u32));
            }
        }
        tracing::info!("Loaded {} PDF pages", documents.len());
        Ok(documents)
    }

    /// One document per element of each JSON file's top-level array
    pub fn load_json_documents(&self) -> Result<Vec<Document>> {
        let mut documents = Vec::new();
        for path in collect_files(&self.json_dir(), "json") {
            documents.extend(json::load_documents(&path)?);
        }
        tracing::info!("Loaded {} JSON records", documents.len());
        Ok(documents)
    }
}

/// Split page-level documents into overlapping chunks that keep their metadata
pub fn split_documents(documents: &[Document], chunker: &TextChunker) -> Vec<Document> {
    documents
        .iter()
        .flat_map(|doc| {
            chunker.split(&doc.content).into_iter().map(|text| Document {
                content: text,
                metadata: doc.metadata.clone(),
            })
        })
        .collect()
}

/// Files below `dir` with the given extension, sorted so runs are repeatable
fn collect_files(dir: &Path, extension: &str) -> Vec<PathBuf> {
    if !dir.is_dir() {
        tracing::warn!("Directory not found: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_page_key() {
        let doc = Document::new("text", "data/pdf/milho.pdf", 4);
        assert_eq!(doc.metadata.page_key(), "data/pdf/milho.pdf:4");
    }

    #[test]
    fn test_split_documents_keeps_metadata() {
        let chunker = TextChunker::new(40, 5);
        let docs = vec![
            Document::new(
                "Corn grows best between twenty and thirty degrees. Soy prefers warmer nights.",
                "a.pdf",
                0,
            ),
            Document::new("Wheat tolerates cold weather well.", "a.pdf", 1),
        ];
        let chunks = split_documents(&docs, &chunker);
        assert!(chunks.len() >= 3);
        assert!(chunks.iter().all(|c| c.metadata.source == "a.pdf"));
        assert_eq!(chunks.last().unwrap().metadata.page, 1);
    }

    #[test]
    fn test_missing_directories_yield_nothing() {
        let dir = tempdir().unwrap();
        let loader = DocumentLoader::new(dir.path());
        assert!(loader.load_pdf_documents().unwrap().is_empty());
        assert!(loader.load_json_documents().unwrap().is_empty());
    }

    #[test]
    fn test_load_pdf_documents_numbers_pages_from_zero() {
        let dir = tempdir().unwrap();
        let pdf_dir = dir.path().join("pdf");
        std::fs::create_dir_all(&pdf_dir).unwrap();
        std::fs::write(
            pdf_dir.join("milho.pdf"),
            crate::test_support::pdf_bytes(&["Plant corn in spring", "", "Harvest in autumn"]),
        )
        .unwrap();

        let loader = DocumentLoader::new(dir.path());
        let docs = loader.load_pdf_documents().unwrap();

        let pages: Vec<u32> = docs.iter().map(|d| d.metadata.page).collect();
        assert_eq!(pages, vec![0, 2]);
        assert!(docs[0].content.contains("Plant corn in spring"));
        assert!(docs[1].content.contains("Harvest in autumn"));
        assert!(docs.iter().all(|d| d.metadata.source.ends_with("milho.pdf")));
    }

    #[test]
    fn test_collect_files_filters_and_sorts() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("b.json"), "[]").unwrap();
        std::fs::write(dir.path().join("a.JSON"), "[]").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();
        let files = collect_files(dir.path(), "json");
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.JSON", "b.json"]);
    }

    #[test]
    fn test_load_json_documents() {
        let dir = tempdir().unwrap();
        let json_dir = dir.path().join("json");
        std::fs::create_dir_all(&json_dir).unwrap();
        std::fs::write(
            json_dir.join("weather_Curitiba.json"),
            r#"[{"date": "2025-03-02"}, {"date": "2025-03-03"}]"#,
        )
        .unwrap();

        let loader = DocumentLoader::new(dir.path());
        let docs = loader.load_json_documents().unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].metadata.page, 1);
        assert_eq!(docs[1].metadata.page, 2);
        assert!(docs[1].content.contains("2025-03-03"));
    }
}
