//! Run transcripts as line-delimited JSON
//!
//! One PassRecord object per line, in step order. This is the persisted
//! layout auditing tools rely on; field names come from the domain
//! records and must stay stable.

use std::fs;
use std::path::Path;

use eyre::{Context, Result};
use tracing::info;

use crate::domain::{PassRecord, RunResult};

/// Write a run's passes to a JSONL transcript file
///
/// Parent directories are created as needed. Step order is preserved.
pub fn write_transcript(path: &Path, result: &RunResult) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create transcript directory")?;
    }

    let mut out = String::new();
    for record in &result.passes {
        out.push_str(&serde_json::to_string(record).context("Failed to serialize pass record")?);
        out.push('\n');
    }

    fs::write(path, out).context(format!("Failed to write transcript to {}", path.display()))?;
    info!(path = %path.display(), passes = result.passes.len(), "transcript written");
    Ok(())
}

/// Read pass records back from a JSONL transcript file
pub fn read_transcript(path: &Path) -> Result<Vec<PassRecord>> {
    let content =
        fs::read_to_string(path).context(format!("Failed to read transcript from {}", path.display()))?;

    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).context("Failed to parse transcript line"))
        .collect()
}
