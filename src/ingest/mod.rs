// src/ingest/mod.rs
//! Record ingestion: reads collector dumps from disk and hands validated
//! events to the engine. Everything fallible about input lives here.

pub mod normalize;
pub mod records;

pub use normalize::{IngestBatch, IngestReport, RejectReason, Rejection, DELETED_SENTINEL};

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::{InfoflowError, Result};
use crate::types::Annotations;
use records::RawDump;

/// Expands `inputs` into JSON files: files are taken as given, directories
/// are walked for `*.json`. The result is sorted and deduplicated so load
/// order never depends on the filesystem.
///
/// # Errors
/// Returns an error if an input does not exist or a directory cannot be read.
pub fn discover(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            return Err(InfoflowError::InvalidInput(format!(
                "input not found: {}",
                input.display()
            )));
        }
        for entry in WalkDir::new(input).follow_links(false) {
            let entry = entry?;
            if entry.file_type().is_file() && is_json(entry.path()) {
                files.push(entry.into_path());
            }
        }
    }
    files.sort();
    files.dedup();
    debug!(files = files.len(), "input files discovered");
    Ok(files)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Loads and normalizes every discovered file into one batch, writing
/// unknown authors as [`DELETED_SENTINEL`].
///
/// # Errors
/// Returns an error on I/O failure or a file that is not a recognised dump.
pub fn load(inputs: &[PathBuf], subreddit: Option<&str>) -> Result<IngestBatch> {
    load_with(inputs, subreddit, DELETED_SENTINEL)
}

/// As [`load`], writing unknown authors as `deleted_author`.
///
/// # Errors
/// Returns an error on I/O failure or a file that is not a recognised dump.
pub fn load_with(
    inputs: &[PathBuf],
    subreddit: Option<&str>,
    deleted_author: &str,
) -> Result<IngestBatch> {
    let mut batch = IngestBatch::default();
    for path in discover(inputs)? {
        let text = fs::read_to_string(&path).map_err(|e| InfoflowError::io(e, &path))?;
        let part = parse_dump_with(&text, subreddit, deleted_author).map_err(|e| match e {
            InfoflowError::Json(inner) => InfoflowError::InvalidInput(format!(
                "{}: {inner}",
                path.display()
            )),
            other => other,
        })?;
        batch.merge(part);
    }

    let report = &batch.report;
    if report.rejected_count() > 0 {
        warn!(rejected = report.rejected_count(), "records rejected at ingestion");
    }
    info!(
        files = report.files_read,
        events = report.events_accepted,
        origins = report.origins_accepted,
        "ingestion complete"
    );
    Ok(batch)
}

/// Normalizes one dump held in memory.
///
/// # Errors
/// Returns `Json` if the text is neither a post dump nor an event array.
pub fn parse_dump(text: &str, subreddit: Option<&str>) -> Result<IngestBatch> {
    parse_dump_with(text, subreddit, DELETED_SENTINEL)
}

fn parse_dump_with(text: &str, subreddit: Option<&str>, deleted_author: &str) -> Result<IngestBatch> {
    let dump: RawDump = serde_json::from_str(text)?;
    let mut batch = match dump {
        RawDump::Posts(posts) => normalize::from_posts(posts, subreddit, deleted_author),
        RawDump::Events(events) => normalize::from_events(events, subreddit),
    };
    batch.report.files_read = 1;
    Ok(batch)
}

/// Reads a flagged-content file: an id array or an id → severity object.
///
/// # Errors
/// Returns an error on I/O failure, malformed JSON, or a negative or
/// non-finite severity.
pub fn load_annotations(path: &Path) -> Result<Annotations> {
    let text = fs::read_to_string(path).map_err(|e| InfoflowError::io(e, path))?;
    let annotations: Annotations = serde_json::from_str(&text)?;
    if let Some((id, w)) = annotations
        .flagged
        .iter()
        .find(|(_, w)| !w.is_finite() || **w < 0.0)
    {
        return Err(InfoflowError::InvalidInput(format!(
            "severity for {id} must be a non-negative number, got {w}"
        )));
    }
    debug!(flagged = annotations.len(), "annotations loaded");
    Ok(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_dump_json_is_an_error() {
        let err = parse_dump(r#"{"not": "a dump"}"#, None).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn empty_array_is_an_empty_batch() {
        let batch = parse_dump("[]", None).unwrap();
        assert!(batch.events.is_empty());
        assert_eq!(batch.report.files_read, 1);
    }
}
