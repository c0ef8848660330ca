//! Pokedex CLI
//!
//! Interactive prompt for browsing PokeAPI location areas and Pokémon.

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pokedex_api::{ApiConfig, PokeApiClient};
use pokedex_cache::{CacheConfig, ExpiringCache};
use pokedex_core::constants::DEFAULT_CACHE_TTL_MS;

mod repl;

use repl::{clean_input, Command, Flow, Session};

const PROMPT: &str = "Pokedex > ";

/// Pokedex - browse the Pokemon world from your terminal
#[derive(Parser)]
#[command(name = "pokedex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// How long fetched responses stay cached, in milliseconds
    #[arg(long, env = "POKEDEX_CACHE_TTL_MS", default_value_t = DEFAULT_CACHE_TTL_MS)]
    cache_ttl_ms: u64,

    /// PokeAPI root URL
    #[arg(long, env = "POKEAPI_BASE_URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    // Logs on stderr, command output on stdout.
    let filter = if cli.verbose {
        "pokedex=debug,info"
    } else {
        "pokedex=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cache = Arc::new(ExpiringCache::with_config(CacheConfig::with_ttl(
        Duration::from_millis(cli.cache_ttl_ms),
    )));

    let mut config = ApiConfig::from_env();
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    info!(base_url = %config.base_url, ttl_ms = cli.cache_ttl_ms, "Starting Pokedex");

    let client = PokeApiClient::new(config, Arc::clone(&cache)).context("Failed to create PokeAPI client")?;
    let result = run(Session::new(client)).await;

    cache.close();
    debug!("Response cache closed");
    result
}

/// Reads commands from stdin until `exit` or end of input.
async fn run(mut session: Session) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = std::io::stdout();

    loop {
        print!("{}", PROMPT);
        stdout.flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            return Ok(());
        };

        let words = clean_input(&line);
        if words.is_empty() {
            continue;
        }

        let Some(command) = Command::parse(&words) else {
            println!("Unknown command");
            continue;
        };

        match session.execute(command, &mut stdout).await {
            Ok(Flow::Exit) => return Ok(()),
            Ok(Flow::Continue) => {}
            Err(e) => println!("{} {:#}", "error:".red(), e),
        }
    }
}
