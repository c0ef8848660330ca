//! Command parsing and dispatch for the interactive prompt.

use std::io::Write;

use anyhow::{Context, Result};
use colored::*;

use pokedex_api::PokeApiClient;

/// Commands shown by `help`, in display order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("help", "Displays a help message"),
    ("exit", "Exit the pokedex"),
    ("map", "Displays location names in Pokemon world, 20 at a time, going forward"),
    ("mapb", "Displays location names in Pokemon world, 20 at a time, going backward"),
    ("explore", "Lists the Pokemon found in a location area: explore <area>"),
    ("inspect", "Shows a Pokemon's stats and types: inspect <pokemon>"),
    ("cache", "Shows response cache statistics"),
];

/// Lowercases `text` and splits it on whitespace.
pub fn clean_input(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// A parsed REPL command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Exit,
    Map,
    MapBack,
    Explore(Option<String>),
    Inspect(Option<String>),
    CacheStats,
}

impl Command {
    /// Parses cleaned input words. Returns `None` for unknown commands.
    pub fn parse(words: &[String]) -> Option<Self> {
        let (name, args) = words.split_first()?;
        let arg = args.first().cloned();
        let cmd = match name.as_str() {
            "help" => Command::Help,
            "exit" => Command::Exit,
            "map" => Command::Map,
            "mapb" => Command::MapBack,
            "explore" => Command::Explore(arg),
            "inspect" => Command::Inspect(arg),
            "cache" => Command::CacheStats,
            _ => return None,
        };
        Some(cmd)
    }
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Per-run REPL state: the API client and the location-area cursor.
pub struct Session {
    client: PokeApiClient,
    next: Option<String>,
    previous: Option<String>,
}

impl Session {
    /// Starts a session positioned before the first location page.
    pub fn new(client: PokeApiClient) -> Self {
        let next = Some(client.first_location_page_url());
        Self {
            client,
            next,
            previous: None,
        }
    }

    /// Runs one command, writing its output to `out`.
    pub async fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        match command {
            Command::Help => self.help(out)?,
            Command::Exit => {
                writeln!(out, "Closing the Pokedex... Goodbye!")?;
                return Ok(Flow::Exit);
            }
            Command::Map => {
                let Some(url) = self.next.clone() else {
                    writeln!(out, "No locations available")?;
                    return Ok(Flow::Continue);
                };
                self.show_location_page(&url, out).await?;
            }
            Command::MapBack => {
                let Some(url) = self.previous.clone() else {
                    writeln!(out, "No previous locations available")?;
                    return Ok(Flow::Continue);
                };
                self.show_location_page(&url, out).await?;
            }
            Command::Explore(area) => {
                let area = area.context("usage: explore <area>")?;
                self.explore(&area, out).await?;
            }
            Command::Inspect(name) => {
                let name = name.context("usage: inspect <pokemon>")?;
                self.inspect(&name, out).await?;
            }
            Command::CacheStats => self.cache_stats(out)?,
        }
        Ok(Flow::Continue)
    }

    fn help(&self, out: &mut impl Write) -> Result<()> {
        writeln!(out, "Welcome to the Pokedex!")?;
        writeln!(out, "Usage:")?;
        writeln!(out)?;
        for (name, description) in COMMANDS {
            writeln!(out, "{:<9} {}", format!("{}:", name).bold(), description)?;
        }
        Ok(())
    }

    async fn show_location_page(&mut self, url: &str, out: &mut impl Write) -> Result<()> {
        let page = self
            .client
            .fetch_location_areas(url)
            .await
            .context("Error fetching location areas")?;

        self.next = page.next;
        self.previous = page.previous;

        for area in &page.results {
            writeln!(out, "{}", area.name)?;
        }
        Ok(())
    }

    async fn explore(&self, area: &str, out: &mut impl Write) -> Result<()> {
        writeln!(out, "Exploring {}...", area.cyan())?;
        let area = self
            .client
            .explore_area(area)
            .await
            .with_context(|| format!("Error exploring {}", area))?;

        if area.pokemon_encounters.is_empty() {
            writeln!(out, "{}", "No Pokemon found here.".yellow())?;
            return Ok(());
        }

        writeln!(out, "{}", "Found Pokemon:".green().bold())?;
        for name in area.pokemon_names() {
            writeln!(out, " - {}", name)?;
        }
        Ok(())
    }

    async fn inspect(&self, name: &str, out: &mut impl Write) -> Result<()> {
        let pokemon = self
            .client
            .fetch_pokemon(name)
            .await
            .with_context(|| format!("Error fetching {}", name))?;

        writeln!(out, "{} {}", "Name:".dimmed(), pokemon.name.green().bold())?;
        writeln!(out, "{} {}", "Height:".dimmed(), pokemon.height)?;
        writeln!(out, "{} {}", "Weight:".dimmed(), pokemon.weight)?;
        if let Some(xp) = pokemon.base_experience {
            writeln!(out, "{} {}", "Base experience:".dimmed(), xp)?;
        }
        writeln!(out, "{}", "Stats:".dimmed())?;
        for stat in &pokemon.stats {
            writeln!(out, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        writeln!(out, "{}", "Types:".dimmed())?;
        for t in &pokemon.types {
            writeln!(out, "  - {}", t.type_.name)?;
        }
        Ok(())
    }

    fn cache_stats(&self, out: &mut impl Write) -> Result<()> {
        let stats = self.client.cache().stats();
        writeln!(out, "{}", "Response cache:".cyan().bold())?;
        writeln!(out, "   {} {}", "Entries:".dimmed(), stats.entries)?;
        writeln!(out, "   {} {}", "Hits:".dimmed(), stats.hits)?;
        writeln!(out, "   {} {}", "Misses:".dimmed(), stats.misses)?;
        writeln!(out, "   {} {:.0}%", "Hit rate:".dimmed(), stats.hit_rate() * 100.0)?;
        writeln!(out, "   {} {}", "Reaped:".dimmed(), stats.reaped)?;
        writeln!(out, "   {} {:?}", "TTL:".dimmed(), stats.ttl)?;
        Ok(())
    }
}
