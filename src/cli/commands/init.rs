use anyhow::{Context, Result};
use console::{Emoji, style};
use std::fs;

use crate::config::{CONFIG_ENV, Config};

static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static CHECK: Emoji<'_, '_> = Emoji("✅ ", "[OK] ");
static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
static KEY: Emoji<'_, '_> = Emoji("🔑 ", "");

pub async fn run(force: bool) -> Result<()> {
    println!();
    println!("{}", style(" agrorag - Initialization ").bold().reverse());
    println!();

    let config_path = Config::config_path()?;

    if config_path.exists() && !force {
        println!(
            "{}Configuration already exists at {}",
            WARN,
            style(config_path.display()).cyan()
        );
        println!("  Use {} to overwrite", style("--force").yellow());
        return Ok(());
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    let default_config = Config::default();
    let config_content = toml::to_string_pretty(&default_config)?;
    fs::write(&config_path, config_content).context("Failed to write config file")?;

    println!(
        "{}Created configuration at {}",
        CHECK,
        style(config_path.display()).cyan()
    );
    println!(
        "  {} Set {} to use another file",
        style("→").cyan(),
        style(CONFIG_ENV).yellow()
    );

    println!();
    println!("{}", style("━".repeat(50)).dim());
    println!();
    println!("{}Next steps:", ROCKET);
    println!();
    println!("  {}Export your weather API key:", KEY);
    println!("    {} export WEATHER_API_KEY=...", style("$").dim());
    println!();
    println!("  {}Put PDFs under {}/pdf and index them:", ROCKET, default_config.data_dir.display());
    println!("    {} agrorag ingest", style("$").dim());
    println!("    {} agrorag query --query \"which days are ideal for planting corn?\"", style("$").dim());
    println!();

    Ok(())
}
