use anyhow::{Context, Result};
use clap::Parser;
use parkrun_scraper::config::{RetryArgs, DEFAULT_CATALOG_PATH, DEFAULT_EVENT_DETAILS_PATH};
use parkrun_scraper::events::load_catalog;
use parkrun_scraper::{enrich_events, logging, write_json, HttpTransport};
use std::path::PathBuf;

/// Fetch each event's course page and classify its terrain
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Event catalog with countries and event features
    #[arg(long, default_value = DEFAULT_CATALOG_PATH)]
    catalog: PathBuf,

    /// Output file
    #[arg(long, default_value = DEFAULT_EVENT_DETAILS_PATH)]
    output: PathBuf,

    /// Only process the first N events
    #[arg(long)]
    limit: Option<usize>,

    #[command(flatten)]
    retry: RetryArgs,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let catalog = load_catalog(&cli.catalog)?;
    let records = enrich_events(
        &catalog,
        &HttpTransport::new(),
        &cli.retry.policy(),
        &cli.retry.user_agent,
        cli.limit,
    )
    .context("Failed to fetch event pages")?;

    write_json(&cli.output, &records)?;
    println!("{} events saved to {}", records.len(), cli.output.display());

    Ok(())
}
