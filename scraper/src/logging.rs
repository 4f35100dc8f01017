use tracing_subscriber::{fmt, EnvFilter};

/// Console logging filtered by `RUST_LOG`, defaulting to info for this crate.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("parkrun_scraper=info"));

    fmt().with_env_filter(filter).with_target(false).init();
}
