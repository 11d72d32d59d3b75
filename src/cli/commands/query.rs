use anyhow::Result;
use console::{Emoji, style};

use super::{load_config, query_service, spinner};

static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "");
static BRAIN: Emoji<'_, '_> = Emoji("🧠 ", "");
static CLOUD: Emoji<'_, '_> = Emoji("🌦️  ", "");

pub async fn run(query: String, top_k: Option<usize>) -> Result<()> {
    let config = load_config()?;
    let top_k = top_k.unwrap_or(config.top_k);
    let service = query_service(&config).await?;

    println!("{}Question: {}", SEARCH, style(&query).cyan());
    println!();

    let progress = spinner(&BRAIN, "Retrieving context and asking the model...")?;
    let result = service.answer(&query, top_k).await;
    progress.finish_and_clear();
    let answer = result?;
    tracing::debug!("Prompt sent to the model:\n{}", answer.prompt);

    println!(
        "{}Context: {} chunks",
        SEARCH,
        style(answer.hits.len()).green().bold()
    );
    for hit in &answer.hits {
        println!(
            "  {} {} {}",
            style("•").cyan(),
            style(&hit.chunk.id).dim(),
            style(format!("({:.3})", hit.score)).dim()
        );
    }
    println!(
        "{}Weather: {} of {} days",
        CLOUD,
        style(answer.weather.records.len()).green().bold(),
        answer.weather.records.len() + answer.weather.failures.len()
    );
    for failure in &answer.weather.failures {
        println!(
            "  {} {} {}",
            style("⚠").yellow(),
            failure.date,
            style(&failure.reason).dim()
        );
    }

    println!();
    println!("{}Answer:", BRAIN);
    println!("{}", answer.response);

    Ok(())
}
