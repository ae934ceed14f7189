// =============================================================================
// Breakout Scout — Main Entry Point
// =============================================================================
//
// fetch  : download today's end-of-day data for every symbol
// scan   : analyse and print highlighted summaries
// post   : analyse and post highlighted summaries to Discord
//
// Secrets come from the environment (`.env` is honoured); everything else
// from the JSON config.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod delivery;
mod discord;
mod error;
mod indicators;
mod market_data;
mod marketstack;
mod runtime_config;
mod scanner;
mod signals;
mod types;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::delivery::{ConsoleSink, DiscordSink};
use crate::discord::DiscordClient;
use crate::market_data::DailyBarCache;
use crate::marketstack::MarketstackClient;
use crate::runtime_config::ScannerConfig;

#[derive(Parser, Debug)]
#[command(name = "breakout-scout", version, about = "Daily breakout scanner for stocks and ETFs")]
struct Cli {
    /// Path to the scanner configuration file.
    #[arg(long, default_value = "scout_config.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download today's end-of-day data into the cache.
    Fetch,
    /// Analyse every symbol and print highlighted summaries.
    Scan,
    /// Analyse every symbol and post highlighted summaries to Discord.
    Post,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = ScannerConfig::load(&cli.config).unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "Failed to load config, using defaults");
        ScannerConfig::default()
    });

    // Narrow the symbol list from env if requested.
    if let Ok(filter) = std::env::var("SCOUT_SYMBOLS") {
        config.retain_symbols(&filter);
    }
    config
        .analysis
        .validate()
        .context("invalid analysis configuration")?;

    info!(
        symbols = config.symbols.len(),
        command = ?cli.command,
        "Breakout Scout starting"
    );

    // ── 2. Bar source ────────────────────────────────────────────────────
    let access_key = std::env::var("MARKETSTACK_API_KEY").unwrap_or_default();
    if access_key.is_empty() {
        warn!("MARKETSTACK_API_KEY is not set; only cached data can be used");
    }
    let client = MarketstackClient::new(access_key, &config.marketstack_url, config.fetch_limit)?;
    let today = chrono::Local::now().date_naive();
    let cache = DailyBarCache::new(client, &config.data_dir, today);

    // ── 3. Run ───────────────────────────────────────────────────────────
    match cli.command {
        Commands::Fetch => {
            let failures = scanner::warm_cache(&cache, &config).await;
            info!(
                cached = config.symbols.len() - failures.len(),
                failed = failures.len(),
                "fetch complete"
            );
        }
        Commands::Scan => {
            let report = scanner::scan(&cache, &config).await;
            scanner::deliver(&report, &ConsoleSink).await;
        }
        Commands::Post => {
            let token = std::env::var("DISCORD_BOT_TOKEN").context("DISCORD_BOT_TOKEN is not set")?;
            let channel =
                std::env::var("DISCORD_CHANNEL_ID").context("DISCORD_CHANNEL_ID is not set")?;
            let sink = DiscordSink::new(DiscordClient::new(&token, channel)?);

            let report = scanner::scan(&cache, &config).await;
            let posted = scanner::deliver(&report, &sink).await;
            info!(posted, "summaries posted to Discord");
        }
    }

    Ok(())
}
