use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::Path;

use crate::cancellations::CancellationRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[clap(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON array of {name, reason, date}
    Json,
    /// One "name - reason (date)" line per cancellation
    Text,
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    Ok(())
}

/// Serialize `value` with four-space indentation and overwrite `path`.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .context("Failed to serialize JSON")?;

    ensure_parent_dir(path)?;
    fs::write(path, buf).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn format_text_line(record: &CancellationRecord) -> String {
    format!(
        "{} - {} ({})",
        record.name,
        record.reason,
        record.date.format("%Y-%m-%d")
    )
}

pub fn write_cancellations(
    path: &Path,
    records: &[CancellationRecord],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(path, records),
        OutputFormat::Text => {
            let text: String = records
                .iter()
                .map(|r| format!("{}\n", format_text_line(r)))
                .collect();
            ensure_parent_dir(path)?;
            fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
        }
    }
}

/// Load a previously written JSON file. A missing file is an empty set.
pub fn read_cancellations(path: &Path) -> Result<Vec<CancellationRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse cancellations in {}", path.display()))
}
