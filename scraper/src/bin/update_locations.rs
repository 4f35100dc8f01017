use anyhow::Result;
use clap::Parser;
use parkrun_scraper::config::{RetryArgs, DEFAULT_LOCATIONS_PATH, PLACES_SEARCH_URL};
use parkrun_scraper::locations::places_search_url;
use parkrun_scraper::{fetch_locations, logging, write_json, FetchRequest, HttpTransport, LocationFile};
use std::path::PathBuf;

/// Refresh parkrun locations from a places text search
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Places API key
    #[arg(long, env = "PLACES_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Text search query
    #[arg(long, default_value = "parkrun")]
    query: String,

    /// Text search endpoint
    #[arg(long, default_value = PLACES_SEARCH_URL)]
    endpoint: String,

    /// Output file
    #[arg(long, default_value = DEFAULT_LOCATIONS_PATH)]
    output: PathBuf,

    #[command(flatten)]
    retry: RetryArgs,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let url = places_search_url(&cli.endpoint, &cli.query, &cli.api_key)?;
    let request = FetchRequest::with_user_agent(url, &cli.retry.user_agent);
    let parkruns = fetch_locations(&HttpTransport::new(), &request, &cli.retry.policy())?;

    write_json(&cli.output, &LocationFile { parkruns })?;
    println!("Locations saved to {}", cli.output.display());

    Ok(())
}
