use anyhow::{Context, Result};
use console::{Emoji, style};
use indicatif::HumanDuration;
use std::sync::Arc;
use std::time::Instant;

use super::{load_config, spinner};
use crate::index::{assign_chunk_ids, index_chunks};
use crate::llm::OllamaProvider;
use crate::parser::{DocumentLoader, TextChunker, split_documents};
use crate::store::{LocalVectorStore, VectorStore};

static BROOM: Emoji<'_, '_> = Emoji("🧹 ", "");
static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static SCISSORS: Emoji<'_, '_> = Emoji("✂️  ", "");
static DATABASE: Emoji<'_, '_> = Emoji("💾 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");

pub async fn run(reset: bool, json: bool) -> Result<()> {
    let started = Instant::now();

    println!();
    println!("{}", style(" agrorag - Ingestion ").bold().reverse());
    println!();

    let config = load_config()?;

    if reset {
        let removed = LocalVectorStore::clear(&config.store_dir).await?;
        if removed {
            println!(
                "{}Cleared vector store at {}",
                BROOM,
                style(config.store_dir.display()).cyan()
            );
        }
    }

    let loader = DocumentLoader::new(&config.data_dir);
    println!(
        "{}Loading PDFs from {}",
        PAPER,
        style(loader.pdf_dir().display()).cyan()
    );
    let mut documents = loader
        .load_pdf_documents()
        .context("Failed to load PDF documents")?;

    if json {
        println!(
            "{}Loading JSON from {}",
            PAPER,
            style(loader.json_dir().display()).cyan()
        );
        documents.extend(
            loader
                .load_json_documents()
                .context("Failed to load JSON documents")?,
        );
    }

    println!(
        "{}Loaded {} pages",
        CHECK,
        style(documents.len()).green().bold()
    );

    let chunker = TextChunker::new(config.chunk_size, config.chunk_overlap);
    let chunks = split_documents(&documents, &chunker);
    let chunks = assign_chunk_ids(chunks, config.ingest.id_strategy);
    println!(
        "{}Split into {} chunks ({} ids)",
        SCISSORS,
        style(chunks.len()).green().bold(),
        style(config.ingest.id_strategy).dim()
    );

    let ollama = Arc::new(OllamaProvider::new(&config.ollama));
    let store = LocalVectorStore::open(&config.store_dir, ollama).await?;

    let progress = spinner(&DATABASE, "Embedding new chunks...")?;
    let result = index_chunks(&store, chunks).await;
    progress.finish_and_clear();
    let report = result?;

    println!(
        "{}Already indexed: {} of {}",
        CHECK,
        style(report.existing).cyan(),
        report.total
    );
    if report.duplicates > 0 {
        println!(
            "  {} {} chunks shared an id with an earlier chunk and were skipped",
            style("⚠").yellow(),
            report.duplicates
        );
    }
    if report.added > 0 {
        println!(
            "{}Added {} new chunks",
            DATABASE,
            style(report.added).green().bold()
        );
    } else {
        println!("{}", style("No new chunks to add.").yellow());
    }
    println!(
        "{}Store now holds {} chunks",
        CHECK,
        style(store.count().await?).green().bold()
    );

    println!();
    println!(
        "{}Done in {}",
        SPARKLE,
        style(HumanDuration(started.elapsed())).green().bold()
    );

    Ok(())
}
