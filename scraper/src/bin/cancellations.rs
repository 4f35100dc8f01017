use anyhow::Result;
use chrono::Local;
use clap::Parser;
use parkrun_scraper::config::{
    default_url, CancellationConfig, RetryArgs, DEFAULT_CANCELLATIONS_PATH,
};
use parkrun_scraper::{logging, run_cancellations, HttpTransport, OutputFormat, PageLayout, WindowMode};
use std::path::PathBuf;

/// Scrape this week's parkrun cancellations into a JSON or text file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Cancellations page to fetch [default: the page matching --layout]
    #[arg(long)]
    url: Option<String>,

    /// Structure of the cancellations page
    #[arg(long, value_enum, default_value_t = PageLayout::WikiTable)]
    layout: PageLayout,

    /// Which dates count as relevant
    #[arg(long, value_enum, default_value_t = WindowMode::IsoWeek)]
    window: WindowMode,

    /// Output file
    #[arg(long, default_value = DEFAULT_CANCELLATIONS_PATH)]
    output: PathBuf,

    /// Output format: json or text
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Merge into the existing output, dropping cancellations already past
    #[arg(long)]
    merge: bool,

    #[command(flatten)]
    retry: RetryArgs,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = CancellationConfig {
        url: cli
            .url
            .unwrap_or_else(|| default_url(cli.layout).to_string()),
        user_agent: cli.retry.user_agent.clone(),
        layout: cli.layout,
        window: cli.window,
        output: cli.output,
        format: cli.format,
        merge: cli.merge,
        retry: cli.retry.policy(),
    };

    let today = Local::now().date_naive();
    let summary = run_cancellations(&config, &HttpTransport::new(), today)?;

    if summary.access_denied {
        println!("Access denied by {}; no cancellations found", config.url);
    }
    println!(
        "{} cancellations saved to {}",
        summary.written,
        summary.output.display()
    );

    Ok(())
}
