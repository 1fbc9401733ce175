use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use tracing::info;

use dashboard_core::{Config, Router, build_router, config::API_KEY_ENV};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-dashboard",
    version,
    about = "Render a weather dashboard from OpenWeather data"
)]
pub struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Render the dashboard for a location hash.
    Show {
        /// Hash such as `#/weather?lat=51.5&lon=-0.12`; defaults to the
        /// current location.
        hash: Option<String>,

        /// Write the document here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Search places by name, optionally rendering one of the results.
    Search {
        query: String,

        /// Render the N-th result (1-based).
        #[arg(long, value_name = "N")]
        open: Option<usize>,

        /// Write the document here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { hash, output } => {
                let mut router = load_router()?;
                router.on_load(hash.as_deref()).await;
                write_document(&router, output.as_deref())
            }
            Command::Search {
                query,
                open,
                output,
            } => search(&query, open, output.as_deref()).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        bail!("API key must not be empty");
    }

    config.set_api_key(api_key.trim().to_string());
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn load_router() -> anyhow::Result<Router> {
    let mut config = Config::load()?;
    config.apply_api_key_override(std::env::var(API_KEY_ENV).ok());
    build_router(&config)
}

async fn search(query: &str, open: Option<usize>, output: Option<&Path>) -> anyhow::Result<()> {
    let mut router = load_router()?;
    let dashboard = router.dashboard().clone();

    dashboard.toggle_search_view();
    dashboard.search().on_input(query);
    dashboard.search().settle().await;

    let places = dashboard.page().lock().search.results.clone();
    if places.is_empty() {
        bail!("No places found for {query:?}");
    }

    let Some(n) = open else {
        for (i, place) in places.iter().enumerate() {
            println!("{:>2}. {:<30} {}", i + 1, place.label(), place.hash());
        }
        return Ok(());
    };

    let Some(hash) = n
        .checked_sub(1)
        .and_then(|index| dashboard.select_search_result(index))
    else {
        bail!("--open {n} is out of range (1..={})", places.len());
    };

    info!(%hash, "Opening search result");
    router.navigate(&hash).await;
    write_document(&router, output)
}

fn write_document(router: &Router, output: Option<&Path>) -> anyhow::Result<()> {
    let html = router.dashboard().page().lock().to_html();
    match output {
        Some(path) => {
            std::fs::write(path, html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "Wrote dashboard");
        }
        None => println!("{html}"),
    }
    Ok(())
}
