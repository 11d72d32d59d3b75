use anyhow::{Context, Result};
use std::path::Path;

/// Extract the text of a PDF file, one entry per page
pub fn extract_pages(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read PDF file: {}", path.display()))?;

    let pages = pdf_extract::extract_text_from_mem_by_pages(&bytes)
        .with_context(|| format!("Failed to extract text from PDF: {}", path.display()))?;

    Ok(pages.iter().map(|page| clean_pdf_text(page)).collect())
}

/// Clean up extracted PDF text
fn clean_pdf_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .replace("  ", " ")
        .replace('\u{0}', "")
        .replace('\u{FEFF}', "")
}
