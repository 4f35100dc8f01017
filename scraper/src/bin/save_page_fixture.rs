use anyhow::{bail, Context, Result};
use clap::Parser;
use parkrun_scraper::config::{default_url, RetryArgs};
use parkrun_scraper::{
    fetch_with_retry, logging, parse_cancellations, FetchOutcome, FetchRequest, HttpTransport,
    PageLayout,
};
use scraper::{Html, Selector};
use std::fs;
use std::path::Path;

/// Save a cancellations page as a regression fixture and report what the parser finds
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Fixture name, saved as src/tests/fixtures/failures/<NAME>.html
    name: String,

    /// Structure of the cancellations page
    #[arg(long, value_enum, default_value_t = PageLayout::WikiTable)]
    layout: PageLayout,

    /// Page to fetch [default: the page matching --layout]
    #[arg(long)]
    url: Option<String>,

    #[command(flatten)]
    retry: RetryArgs,
}

fn count(document: &Html, selector: &str) -> usize {
    match Selector::parse(selector) {
        Ok(selector) => document.select(&selector).count(),
        Err(_) => 0,
    }
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    let url = cli
        .url
        .unwrap_or_else(|| default_url(cli.layout).to_string());
    println!("Fetching HTML from {}...", url);

    let request = FetchRequest::with_user_agent(url.as_str(), &cli.retry.user_agent);
    let html = match fetch_with_retry(&HttpTransport::new(), &request, &cli.retry.policy())? {
        FetchOutcome::Page(html) => html,
        FetchOutcome::AccessDenied => bail!("Access denied by {}, nothing to save", url),
    };

    let failures_dir = Path::new("src/tests/fixtures/failures");
    fs::create_dir_all(failures_dir).context("Failed to create failures directory")?;

    let file_path = failures_dir.join(format!("{}.html", cli.name));
    fs::write(&file_path, &html).context("Failed to write HTML file")?;
    println!("Saved HTML to {} for regression testing", file_path.display());

    let document = Html::parse_document(&html);
    println!("HTML analysis results:");
    println!("  - Table rows: {}", count(&document, "table tr"));
    println!("  - Cancellation sections: {}", count(&document, "section.clearfix"));
    println!("  - Date headings: {}", count(&document, "section.clearfix h2"));

    let report = parse_cancellations(&html, cli.layout);
    println!(
        "Parsed {} cancellations, skipped {} malformed entries",
        report.records.len(),
        report.skipped
    );
    if report.records.is_empty() {
        println!("No cancellations parsed; this page will fail the regression test until the parser handles it.");
    }

    Ok(())
}
