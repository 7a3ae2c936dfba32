// src/ingest/normalize.rs
//! Turns raw collector records into validated events and post origins.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::records::{present, RawComment, RawEvent, RawPost};
use crate::types::{ContentOrigin, InteractionEvent};

/// Default author substituted when a post's or comment's author is unknown,
/// so replies to it are excluded with the other deleted accounts.
pub const DELETED_SENTINEL: &str = "[deleted]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RejectReason {
    MissingAuthor,
    MissingTarget,
    MissingTimestamp,
    InvalidTimestamp,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub record_id: String,
    pub reason: RejectReason,
}

/// What ingestion read, kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub files_read: usize,
    pub posts_seen: usize,
    pub comments_seen: usize,
    /// Flat event records read.
    pub events_seen: usize,
    pub events_accepted: usize,
    pub origins_accepted: usize,
    /// Records outside the subreddit filter.
    pub filtered_out: usize,
    pub rejected: Vec<Rejection>,
}

impl IngestReport {
    pub fn merge(&mut self, other: Self) {
        self.files_read += other.files_read;
        self.posts_seen += other.posts_seen;
        self.comments_seen += other.comments_seen;
        self.events_seen += other.events_seen;
        self.events_accepted += other.events_accepted;
        self.origins_accepted += other.origins_accepted;
        self.filtered_out += other.filtered_out;
        self.rejected.extend(other.rejected);
    }

    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Validated records ready for the graph builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestBatch {
    pub events: Vec<InteractionEvent>,
    pub origins: Vec<ContentOrigin>,
    pub report: IngestReport,
}

impl IngestBatch {
    pub fn merge(&mut self, other: Self) {
        self.events.extend(other.events);
        self.origins.extend(other.origins);
        self.report.merge(other.report);
    }
}

/// Case-insensitive subreddit filter; `None` keeps everything.
fn keeps(filter: Option<&str>, subreddit: &str) -> bool {
    filter.map_or(true, |f| f.eq_ignore_ascii_case(subreddit))
}

/// Flattens posts and their comments into reply events.
///
/// A comment replying to a comment (`t1_`) targets that comment's author
/// when it is in the same dump; every other comment targets the post author.
/// Unknown authors are replaced by `deleted_author`.
#[must_use]
pub fn from_posts(posts: Vec<RawPost>, subreddit: Option<&str>, deleted_author: &str) -> IngestBatch {
    let mut batch = IngestBatch::default();

    for post in posts {
        batch.report.posts_seen += 1;
        batch.report.comments_seen += post.comments.len();
        if !keeps(subreddit, &post.subreddit) {
            batch.report.filtered_out += 1 + post.comments.len();
            continue;
        }

        let post_author = present(post.author.as_deref()).map(str::to_string);
        match (&post_author, post.created_utc.as_ref().map(|t| t.resolve())) {
            (None, _) => reject(&mut batch.report, &post.post_id, RejectReason::MissingAuthor),
            (_, None) => reject(&mut batch.report, &post.post_id, RejectReason::MissingTimestamp),
            (_, Some(None)) => {
                reject(&mut batch.report, &post.post_id, RejectReason::InvalidTimestamp);
            }
            (Some(author), Some(Some(timestamp))) => {
                batch.origins.push(ContentOrigin {
                    content_id: post.post_id.clone(),
                    author_id: author.clone(),
                    timestamp,
                    subreddit_context: post.subreddit.clone(),
                    is_flagged: post.flagged,
                });
                batch.report.origins_accepted += 1;
            }
        }

        let post_target = post_author.unwrap_or_else(|| deleted_author.to_string());
        let authors: HashMap<&str, &str> = post
            .comments
            .iter()
            .map(|c| {
                (
                    c.comment_id.as_str(),
                    present(c.author.as_deref()).unwrap_or(deleted_author),
                )
            })
            .collect();

        for comment in &post.comments {
            match comment_event(comment, &post, &post_target, &authors) {
                Ok(event) => {
                    batch.events.push(event);
                    batch.report.events_accepted += 1;
                }
                Err(reason) => reject(&mut batch.report, &comment.comment_id, reason),
            }
        }
    }
    batch
}

fn comment_event(
    comment: &RawComment,
    post: &RawPost,
    post_author: &str,
    authors: &HashMap<&str, &str>,
) -> Result<InteractionEvent, RejectReason> {
    let source = present(comment.author.as_deref()).ok_or(RejectReason::MissingAuthor)?;
    let timestamp = comment
        .created_utc
        .as_ref()
        .ok_or(RejectReason::MissingTimestamp)?
        .resolve()
        .ok_or(RejectReason::InvalidTimestamp)?;

    let (parent, target) = match comment.parent_id.as_deref().filter(|p| !p.is_empty()) {
        None => (post.post_id.as_str(), post_author),
        Some(p) => {
            if let Some(id) = p.strip_prefix("t3_") {
                (id, post_author)
            } else {
                let id = p.strip_prefix("t1_").unwrap_or(p);
                (id, authors.get(id).copied().unwrap_or(post_author))
            }
        }
    };

    Ok(InteractionEvent {
        source_user_id: source.to_string(),
        target_user_id: target.to_string(),
        content_id: comment.comment_id.clone(),
        parent_content_id: Some(parent.to_string()),
        timestamp,
        subreddit_context: post.subreddit.clone(),
        is_flagged: comment.flagged,
    })
}

/// Validates already-flat events.
#[must_use]
pub fn from_events(events: Vec<RawEvent>, subreddit: Option<&str>) -> IngestBatch {
    let mut batch = IngestBatch::default();
    for raw in events {
        batch.report.events_seen += 1;
        if !keeps(subreddit, &raw.subreddit_context) {
            batch.report.filtered_out += 1;
            continue;
        }
        match validate_event(raw) {
            Ok(event) => {
                batch.events.push(event);
                batch.report.events_accepted += 1;
            }
            Err((id, reason)) => reject(&mut batch.report, &id, reason),
        }
    }
    batch
}

fn validate_event(raw: RawEvent) -> Result<InteractionEvent, (String, RejectReason)> {
    let fail = |reason| (raw.content_id.clone(), reason);
    let source = present(raw.source_user_id.as_deref()).ok_or_else(|| fail(RejectReason::MissingAuthor))?;
    let target = present(raw.target_user_id.as_deref()).ok_or_else(|| fail(RejectReason::MissingTarget))?;
    let timestamp = raw
        .timestamp
        .as_ref()
        .ok_or_else(|| fail(RejectReason::MissingTimestamp))?
        .resolve()
        .ok_or_else(|| fail(RejectReason::InvalidTimestamp))?;

    Ok(InteractionEvent {
        source_user_id: source.to_string(),
        target_user_id: target.to_string(),
        content_id: raw.content_id.clone(),
        parent_content_id: raw.parent_content_id.clone().filter(|p| !p.is_empty()),
        timestamp,
        subreddit_context: raw.subreddit_context.clone(),
        is_flagged: raw.is_flagged,
    })
}

fn reject(report: &mut IngestReport, record_id: &str, reason: RejectReason) {
    debug!(record = record_id, ?reason, "record rejected");
    report.rejected.push(Rejection {
        record_id: record_id.to_string(),
        reason,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::records::RawDump;

    fn posts(json: &str) -> Vec<RawPost> {
        match serde_json::from_str(json).unwrap() {
            RawDump::Posts(p) => p,
            RawDump::Events(_) => panic!("parsed as events"),
        }
    }

    const DUMP: &str = r#"[{
        "post_id": "p1", "subreddit": "health", "author": "op",
        "created_utc": 1709294400, "flagged": true,
        "comments": [
            {"comment_id": "k1", "author": "alice", "created_utc": 1709298000, "parent_id": "t3_p1"},
            {"comment_id": "k2", "author": "bob", "created_utc": 1709301600, "parent_id": "t1_k1"},
            {"comment_id": "k3", "author": "carol", "created_utc": 1709305200, "parent_id": "t1_gone"},
            {"comment_id": "k4", "created_utc": 1709305200, "parent_id": "t3_p1"}
        ]
    }]"#;

    #[test]
    fn comments_target_parent_comment_author_or_post_author() {
        let batch = from_posts(posts(DUMP), None, DELETED_SENTINEL);
        let target = |id: &str| {
            batch
                .events
                .iter()
                .find(|e| e.content_id == id)
                .map(|e| e.target_user_id.as_str())
        };
        assert_eq!(target("k1"), Some("op"));
        assert_eq!(target("k2"), Some("alice"));
        assert_eq!(target("k3"), Some("op"));
        assert_eq!(batch.events[1].parent_content_id.as_deref(), Some("k1"));
    }

    #[test]
    fn flagged_post_becomes_an_origin() {
        let batch = from_posts(posts(DUMP), None, DELETED_SENTINEL);
        assert_eq!(batch.origins.len(), 1);
        assert!(batch.origins[0].is_flagged);
    }

    #[test]
    fn authorless_comment_is_rejected_and_counted() {
        let batch = from_posts(posts(DUMP), None, DELETED_SENTINEL);
        assert_eq!(batch.report.events_accepted, 3);
        assert_eq!(
            batch.report.rejected,
            vec![Rejection {
                record_id: "k4".into(),
                reason: RejectReason::MissingAuthor,
            }]
        );
    }

    #[test]
    fn configured_placeholder_replaces_missing_authors() {
        let json = r#"[{"post_id": "p1", "subreddit": "health", "created_utc": 1,
                       "comments": [{"comment_id": "k1", "author": "a", "created_utc": 2}]}]"#;
        let batch = from_posts(posts(json), None, "[gone]");
        assert_eq!(batch.events[0].target_user_id, "[gone]");
    }

    #[test]
    fn authorless_post_still_yields_comments_to_sentinel() {
        let json = r#"[{"post_id": "p1", "subreddit": "health", "created_utc": 1,
                       "comments": [{"comment_id": "k1", "author": "a", "created_utc": 2}]}]"#;
        let batch = from_posts(posts(json), None, DELETED_SENTINEL);
        assert!(batch.origins.is_empty());
        assert_eq!(batch.events[0].target_user_id, DELETED_SENTINEL);
        assert_eq!(batch.report.rejected[0].reason, RejectReason::MissingAuthor);
    }

    #[test]
    fn subreddit_filter_drops_other_communities() {
        let batch = from_posts(posts(DUMP), Some("news"), DELETED_SENTINEL);
        assert!(batch.events.is_empty());
        assert_eq!(batch.report.filtered_out, 5);
    }

    #[test]
    fn flat_events_require_source_and_timestamp() {
        let raw: Vec<RawEvent> = serde_json::from_str(
            r#"[{"content_id": "c1", "target_user_id": "b", "timestamp": 1},
                {"content_id": "c2", "source_user_id": "a", "target_user_id": "b"},
                {"content_id": "c3", "source_user_id": "a", "target_user_id": "b", "timestamp": 1}]"#,
        )
        .unwrap();
        let batch = from_events(raw, None);
        assert_eq!(batch.events.len(), 1);
        let reasons: Vec<RejectReason> = batch.report.rejected.iter().map(|r| r.reason).collect();
        assert_eq!(reasons, [RejectReason::MissingAuthor, RejectReason::MissingTimestamp]);
    }
}
