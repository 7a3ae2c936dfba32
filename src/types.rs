// src/types.rs
//! Canonical records shared by every stage of the engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type UserId = String;
pub type ContentId = String;

/// A single reply relationship between two users on a piece of content.
///
/// Built once by the ingestor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    /// Author of the reply.
    pub source_user_id: UserId,
    /// User being replied to (the post author for a top-level comment).
    pub target_user_id: UserId,
    pub content_id: ContentId,
    #[serde(default)]
    pub parent_content_id: Option<ContentId>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub subreddit_context: String,
    #[serde(default)]
    pub is_flagged: bool,
}

impl InteractionEvent {
    /// True when a user replies to their own content.
    #[must_use]
    pub fn is_self_reply(&self) -> bool {
        self.source_user_id == self.target_user_id
    }
}

/// A top-level post. Posts carry no interaction of their own but can be
/// flagged and therefore root a cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentOrigin {
    pub content_id: ContentId,
    pub author_id: UserId,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub subreddit_context: String,
    #[serde(default)]
    pub is_flagged: bool,
}

/// Flagged content ids with their severity weight.
///
/// Deserializes from either a JSON array of ids (all weighted 1.0) or an
/// object mapping id to weight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnnotationInput")]
pub struct Annotations {
    pub flagged: BTreeMap<ContentId, f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationInput {
    Ids(Vec<ContentId>),
    Weighted(BTreeMap<ContentId, f64>),
    Wrapped { flagged: BTreeMap<ContentId, f64> },
}

impl From<AnnotationInput> for Annotations {
    fn from(input: AnnotationInput) -> Self {
        match input {
            AnnotationInput::Ids(ids) => Self::from_ids(ids),
            AnnotationInput::Weighted(flagged) | AnnotationInput::Wrapped { flagged } => {
                Self { flagged }
            }
        }
    }
}

pub const DEFAULT_SEVERITY: f64 = 1.0;

impl Annotations {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flags every id with the default severity.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ContentId>,
    {
        Self {
            flagged: ids
                .into_iter()
                .map(|id| (id.into(), DEFAULT_SEVERITY))
                .collect(),
        }
    }

    pub fn flag(&mut self, content_id: impl Into<ContentId>, severity: f64) {
        self.flagged.insert(content_id.into(), severity);
    }

    /// Adds ids marked `is_flagged` at ingestion. Explicit weights win.
    pub fn absorb_event_flags<'a, I>(&mut self, flagged_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for id in flagged_ids {
            self.flagged
                .entry(id.to_string())
                .or_insert(DEFAULT_SEVERITY);
        }
    }

    #[must_use]
    pub fn severity(&self, content_id: &str) -> f64 {
        self.flagged
            .get(content_id)
            .copied()
            .unwrap_or(DEFAULT_SEVERITY)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flagged.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flagged.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ContentId> {
        self.flagged.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotations_parse_plain_id_list() {
        let a: Annotations = serde_json::from_str(r#"["c1", "c2"]"#).unwrap();
        assert_eq!(a.len(), 2);
        assert!((a.severity("c2") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn annotations_parse_weighted_map() {
        let a: Annotations = serde_json::from_str(r#"{"c1": 2.5}"#).unwrap();
        assert!((a.severity("c1") - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn event_flags_do_not_override_explicit_weights() {
        let mut a = Annotations::new();
        a.flag("c1", 3.0);
        a.absorb_event_flags(["c1", "c9"]);
        assert!((a.severity("c1") - 3.0).abs() < f64::EPSILON);
        assert!(a.flagged.contains_key("c9"));
    }
}
