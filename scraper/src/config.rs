use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

use crate::cancellations::PageLayout;
use crate::fetch::RetryPolicy;
use crate::output::OutputFormat;
use crate::window::WindowMode;

pub const WIKI_CANCELLATIONS_URL: &str = "https://wiki.parkrun.com/index.php/Cancellations/Global";
pub const CANCELLATIONS_URL: &str = "https://www.parkrun.com/cancellations/";
pub const PLACES_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";

pub const DEFAULT_CANCELLATIONS_PATH: &str = "_data/cancellations.json";
pub const DEFAULT_CATALOG_PATH: &str = "parkruns.json";
pub const DEFAULT_EVENT_DETAILS_PATH: &str = "parkrun_details.json";
pub const DEFAULT_LOCATIONS_PATH: &str = "parkruns.json";

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.36";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_DELAY_SECS: u64 = 10;

/// The page each layout was written against.
pub fn default_url(layout: PageLayout) -> &'static str {
    match layout {
        PageLayout::WikiTable => WIKI_CANCELLATIONS_URL,
        PageLayout::DateHeadings => CANCELLATIONS_URL,
    }
}

/// Everything one cancellations run needs, passed in rather than read from globals.
#[derive(Debug, Clone)]
pub struct CancellationConfig {
    pub url: String,
    pub user_agent: String,
    pub layout: PageLayout,
    pub window: WindowMode,
    pub output: PathBuf,
    pub format: OutputFormat,
    /// Merge into the records already at `output` instead of overwriting them.
    pub merge: bool,
    pub retry: RetryPolicy,
}

impl Default for CancellationConfig {
    fn default() -> Self {
        Self {
            url: WIKI_CANCELLATIONS_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            layout: PageLayout::WikiTable,
            window: WindowMode::IsoWeek,
            output: PathBuf::from(DEFAULT_CANCELLATIONS_PATH),
            format: OutputFormat::Json,
            merge: false,
            retry: RetryPolicy::default(),
        }
    }
}

/// Retry flags shared by every binary.
#[derive(Args, Debug, Clone)]
pub struct RetryArgs {
    /// Maximum number of fetch attempts
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub attempts: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Seconds to wait between attempts
    #[arg(long, default_value_t = DEFAULT_DELAY_SECS)]
    pub delay_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl RetryArgs {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.attempts,
            timeout: Duration::from_secs(self.timeout_secs),
            delay: Duration::from_secs(self.delay_secs),
            ..RetryPolicy::default()
        }
    }
}
