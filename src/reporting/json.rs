// src/reporting/json.rs
use anyhow::Result;
use serde::Serialize;

use crate::ingest::IngestReport;
use crate::pipeline::AnalysisReport;

/// Top-level JSON document of an `analyze` run.
#[derive(Debug, Serialize)]
pub struct RunOutput<'a> {
    pub ingest: &'a IngestReport,
    /// One entry per cascade window.
    pub runs: &'a [AnalysisReport],
}

/// Prints a serializable object as JSON to stdout.
///
/// # Errors
/// Returns error if serialization fails.
pub fn print_json<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}
