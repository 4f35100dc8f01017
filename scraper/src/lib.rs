pub mod cancellations;
pub mod config;
pub mod events;
pub mod fetch;
pub mod locations;
pub mod logging;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod window;

#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::cancellations::{parse_cancellations, CancellationRecord, PageLayout, ParseReport};
pub use crate::config::CancellationConfig;
pub use crate::events::{classify_terrain, enrich_events, EventCatalog, EventRecord, Terrain};
pub use crate::fetch::{
    fetch_with_retry, FetchError, FetchOutcome, FetchRequest, HttpTransport, RetryPolicy, Transport,
};
pub use crate::locations::{fetch_locations, LocationFile, ParkrunLocation};
pub use crate::merge::merge_by_key;
pub use crate::output::{write_cancellations, write_json, OutputFormat};
pub use crate::pipeline::{run_cancellations, RunSummary};
pub use crate::window::{filter_to_window, DateWindow, WindowMode};
