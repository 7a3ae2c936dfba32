// src/ingest/records.rs
//! Loosely typed input shapes, as collectors write them.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

/// A whole input file: collector posts with nested comments, or already
/// normalized reply events.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawDump {
    Posts(Vec<RawPost>),
    Events(Vec<RawEvent>),
}

#[derive(Debug, Deserialize)]
pub struct RawPost {
    pub post_id: String,
    #[serde(default)]
    pub subreddit: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_utc: Option<RawTimestamp>,
    #[serde(default, alias = "is_flagged")]
    pub flagged: bool,
    #[serde(default)]
    pub comments: Vec<RawComment>,
}

#[derive(Debug, Deserialize)]
pub struct RawComment {
    pub comment_id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub created_utc: Option<RawTimestamp>,
    /// `t1_<comment>` for replies to comments, `t3_<post>` for top-level.
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default, alias = "is_flagged")]
    pub flagged: bool,
}

#[derive(Debug, Deserialize)]
pub struct RawEvent {
    pub content_id: String,
    #[serde(default)]
    pub source_user_id: Option<String>,
    #[serde(default)]
    pub target_user_id: Option<String>,
    #[serde(default)]
    pub parent_content_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<RawTimestamp>,
    #[serde(default)]
    pub subreddit_context: String,
    #[serde(default)]
    pub is_flagged: bool,
}

/// Epoch seconds, RFC 3339, or a zone-less `YYYY-MM-DD[T ]HH:MM:SS` read as UTC.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawTimestamp {
    Epoch(f64),
    Text(String),
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl RawTimestamp {
    /// `None` when the value cannot be read as a point in time.
    #[must_use]
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Epoch(secs) => from_epoch(*secs),
            Self::Text(text) => parse_text(text.trim()),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn from_epoch(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs.abs() > 1e12 {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}

fn parse_text(text: &str) -> Option<DateTime<Utc>> {
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(text, f).ok())
    {
        return Some(dt.and_utc());
    }
    text.parse::<f64>().ok().and_then(from_epoch)
}

/// Trims an author field; blank counts as missing.
#[must_use]
pub fn present(author: Option<&str>) -> Option<&str> {
    author.map(str::trim).filter(|a| !a.is_empty())
}
