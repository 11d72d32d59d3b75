pub mod commands;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "agrorag")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Weather-aware answers over agricultural documents using a local LLM", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long, default_value = "false")]
        force: bool,
    },

    /// Load, split and index the document corpus, skipping chunks already stored
    Ingest {
        /// Clear the persisted vector store before ingesting
        #[arg(long, default_value = "false")]
        reset: bool,

        /// Also ingest JSON documents from <data_dir>/json
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Answer a question from retrieved documents and recent weather
    Query {
        /// Question for the language model
        #[arg(short, long)]
        query: String,

        /// Number of chunks to retrieve (defaults to top_k in the config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1", env = "AGRORAG_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8000", env = "AGRORAG_PORT")]
        port: u16,
    },

    /// Fetch daily weather history and print it as JSON
    Weather {
        /// Location to query (defaults to weather.default_location)
        #[arg(short, long)]
        location: Option<String>,

        /// First day, YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,

        /// Last day (inclusive), YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,

        /// Write the records to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
