mod cli;
mod config;
mod index;
mod llm;
mod parser;
mod query;
mod server;
mod store;
mod weather;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Warnings only by default, RUST_LOG=info for request and ingest detail
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cli::commands::init::run(force).await?;
        }
        Commands::Ingest { reset, json } => {
            cli::commands::ingest::run(reset, json).await?;
        }
        Commands::Query { query, top_k } => {
            cli::commands::query::run(query, top_k).await?;
        }
        Commands::Serve { host, port } => {
            cli::commands::serve::run(host, port).await?;
        }
        Commands::Weather {
            location,
            start,
            end,
            output,
        } => {
            cli::commands::weather::run(location, start, end, output).await?;
        }
    }

    Ok(())
}
