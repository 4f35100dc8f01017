use anyhow::{bail, Result};
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::info;

use crate::cancellations::parse_cancellations;
use crate::config::CancellationConfig;
use crate::fetch::{fetch_with_retry, FetchOutcome, FetchRequest, Transport};
use crate::merge::merge_by_key;
use crate::output::{read_cancellations, write_cancellations, OutputFormat};
use crate::window::{filter_to_window, DateWindow};

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub access_denied: bool,
    pub parsed: usize,
    pub skipped: usize,
    /// Records inside the date window.
    pub kept: usize,
    /// Records in the output file, after any merge.
    pub written: usize,
    pub output: PathBuf,
}

/// Fetch, parse, filter, optionally merge, then write. Nothing is written if the
/// fetch runs out of attempts.
pub fn run_cancellations(
    config: &CancellationConfig,
    transport: &dyn Transport,
    today: NaiveDate,
) -> Result<RunSummary> {
    if config.merge && config.format != OutputFormat::Json {
        bail!("Merging needs JSON output, the prior file is read back as JSON");
    }

    let request = FetchRequest::with_user_agent(config.url.as_str(), &config.user_agent);
    let outcome = fetch_with_retry(transport, &request, &config.retry)?;

    let (report, access_denied) = match outcome {
        FetchOutcome::Page(html) => (parse_cancellations(&html, config.layout), false),
        FetchOutcome::AccessDenied => (Default::default(), true),
    };

    let window = DateWindow::for_date(config.window, today);
    let parsed = report.records.len();
    let fresh = filter_to_window(report.records, &window);
    let kept = fresh.len();
    info!(parsed, kept, start = %window.start, end = %window.end, "filtered cancellations");

    let records = if config.merge {
        let existing = read_cancellations(&config.output)?;
        merge_by_key(existing, fresh, today)
    } else {
        fresh
    };

    write_cancellations(&config.output, &records, config.format)?;
    info!(count = records.len(), output = %config.output.display(), "saved cancellations");

    Ok(RunSummary {
        access_denied,
        parsed,
        skipped: report.skipped,
        kept,
        written: records.len(),
        output: config.output.clone(),
    })
}
