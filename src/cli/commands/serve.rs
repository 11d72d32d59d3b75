use anyhow::Result;
use console::{Emoji, style};
use std::sync::Arc;

use super::{load_config, query_service};
use crate::server::{self, AppState};

static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");

pub async fn run(host: String, port: u16) -> Result<()> {
    let config = load_config()?;
    let listener = server::bind(&host, port).await?;
    let addr = listener.local_addr()?;

    let state = Arc::new(AppState {
        service: query_service(&config).await?,
        default_top_k: config.top_k,
    });

    println!(
        "{}Serving on {}",
        GLOBE,
        style(format!("http://{}", addr)).blue().underlined()
    );
    println!("  {} POST /search  {{\"query\": \"...\", \"top_k\": 3}}", style("→").cyan());
    println!("  {} GET  /health", style("→").cyan());

    server::serve(state, listener).await
}
