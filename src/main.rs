//! Hourse-Harvest main entry point
//!
//! This is the command-line interface for harvesting saved listing search pages.

use anyhow::Context;
use clap::Parser;
use hourse_harvest::config::{load_config_with_hash, Config};
use hourse_harvest::harvest::harvest_documents;
use hourse_harvest::parser::{ListingParser, YungChing};
use hourse_harvest::storage::{SqliteStorage, Storage};
use hourse_harvest::HtmlFragment;
use scraper::Html;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Hourse-Harvest: real-estate listing extraction
///
/// Extracts listings from saved search-result pages and stores them by city
/// and section.
#[derive(Parser, Debug)]
#[command(name = "hourse-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Real-estate listing extraction", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Print the first results-page URL for each configured city and exit
    #[arg(long, conflicts_with_all = ["stats", "ingest"])]
    plan: bool,

    /// Show listing counts from the database and exit
    #[arg(long, conflicts_with_all = ["plan", "ingest"])]
    stats: bool,

    /// Saved results pages to harvest, in page order
    #[arg(long, value_name = "FILE", num_args = 1.., requires = "city")]
    ingest: Vec<PathBuf>,

    /// City the saved pages were searched for
    #[arg(long)]
    city: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    if cli.plan {
        handle_plan(&config)
    } else if cli.stats {
        handle_stats(&config)
    } else if let Some(city) = cli.city.as_deref().filter(|_| !cli.ingest.is_empty()) {
        handle_ingest(&config, city, &cli.ingest)
    } else {
        anyhow::bail!("nothing to do: pass --plan, --stats or --ingest FILE... --city NAME")
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hourse_harvest=info,warn"),
            1 => EnvFilter::new("hourse_harvest=debug,info"),
            2 => EnvFilter::new("hourse_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn city_parser(config: &Config, city: &str) -> anyhow::Result<YungChing> {
    Ok(YungChing::from_config(city, config.base_url()?, &config.search))
}

/// Handles --plan: shows the first request URL per city
fn handle_plan(config: &Config) -> anyhow::Result<()> {
    println!("=== Hourse-Harvest Plan ===\n");
    println!("Site: {}", config.site.base_url);
    println!(
        "Price window: {}-{}, {} per page\n",
        config.search.min_price, config.search.max_price, config.search.page_size
    );

    for city in &config.search.cities {
        let parser = city_parser(config, city)?;
        let pagination = ListingParser::<HtmlFragment>::new_pagination(&parser);
        println!(
            "  {} → {}",
            city,
            ListingParser::<HtmlFragment>::page_url(&parser, &pagination)
        );
    }

    Ok(())
}

/// Handles --stats: shows counts from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    let storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    println!("Database: {}\n", config.output.database_path);
    println!("  Cities:   {}", storage.count_cities()?);
    println!("  Sections: {}", storage.count_sections()?);
    println!("  Listings: {}", storage.count_hourses()?);

    Ok(())
}

/// Handles --ingest: harvests saved results pages into the database
fn handle_ingest(config: &Config, city: &str, files: &[PathBuf]) -> anyhow::Result<()> {
    let parser = city_parser(config, city)?;
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;

    let documents = files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path)
                .map(|html| Html::parse_document(&html))
                .with_context(|| format!("reading {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let summary = harvest_documents(&parser, &documents, &mut storage, &CancellationToken::new())?;

    for page in &summary.pages {
        println!(
            "{}: {} items, {} stored, {} skipped, {} duplicates",
            page.url, page.items, page.stored, page.skipped, page.duplicates
        );
    }
    println!(
        "\n✓ {}: {} stored, {} skipped, {} duplicates ({} pages reported)",
        summary.city,
        summary.stored(),
        summary.skipped(),
        summary.duplicates(),
        summary.total_pages
    );

    Ok(())
}
