// src/propagation/cascade.rs
//! Reconstruction of a single cascade tree.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::graph::{ContentIndex, ContentRecord, InteractionGraph};
use crate::types::{ContentId, UserId};

/// Floor for the elapsed time used in velocity, so a burst inside one
/// timestamp tick does not divide by zero.
const MIN_ELAPSED_HOURS: f64 = 1.0 / 3600.0;

/// A user reached by a cascade.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeNode {
    pub user_id: UserId,
    /// Hops from the root author; the root itself is 0.
    pub depth: usize,
    pub parent_user_id: Option<UserId>,
    pub first_seen: DateTime<Utc>,
    /// Content through which the user joined.
    pub via_content_id: ContentId,
}

/// Parent → child link in the cascade tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CascadeEdge {
    pub source_user_id: UserId,
    pub target_user_id: UserId,
    pub content_id: ContentId,
    pub timestamp: DateTime<Utc>,
}

/// The tree of interactions traceable back to one flagged content item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cascade {
    pub root_content_id: ContentId,
    pub root_user_id: UserId,
    pub root_timestamp: DateTime<Utc>,
    /// In order of joining; the root author comes first.
    pub nodes: Vec<CascadeNode>,
    /// Ordered by timestamp.
    pub edges: Vec<CascadeEdge>,
    pub depth: usize,
    pub time_to_max_depth_hours: f64,
    /// Depth gained per hour until the deepest level was first reached.
    pub velocity: f64,
    /// Distinct subreddits in first-occurrence order.
    pub subreddits: Vec<String>,
    pub severity: f64,
    /// In-window replies by tracked users, including repeat participants.
    pub interaction_count: usize,
}

impl Cascade {
    #[must_use]
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.nodes.iter().any(|n| n.user_id == user_id)
    }

    pub fn participants(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.user_id.as_str())
    }
}

/// Why a flagged item produced no cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SkipReason {
    /// Not present in the content index.
    NotFound,
    /// Authored by an excluded or deleted account.
    ExcludedAuthor,
}

/// Builds the cascade rooted at `root_id`.
///
/// Descendants are visited in `(timestamp, content_id)` order, and a reply
/// is only considered after its parent. Replies outside
/// `[root, root + window]` are dropped together with their subtree. A user
/// who already joined gets no second node. Replies by excluded users add no
/// node; their children attach to the nearest tracked ancestor.
///
/// # Errors
/// Returns the [`SkipReason`] when the root cannot anchor a cascade.
pub fn reconstruct(
    graph: &InteractionGraph,
    root_id: &str,
    severity: f64,
    window: Duration,
) -> Result<Cascade, SkipReason> {
    let content = graph.content();
    let root = content.get(root_id).ok_or(SkipReason::NotFound)?;
    if !is_tracked(graph, &root.author_id) {
        return Err(SkipReason::ExcludedAuthor);
    }

    let mut tree = TreeBuilder::new(root);
    let mut anchors: HashMap<&str, usize> = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::new();
    anchors.insert(root.content_id.as_str(), 0);
    visited.insert(root.content_id.as_str());

    let mut frontier: Frontier<'_> = BinaryHeap::new();
    admit(content, root_id, &mut frontier, &mut visited);

    while let Some(Reverse((ts, id))) = frontier.pop() {
        let Some(record) = content.get(id) else {
            continue;
        };
        if ts < tree.root_ts || ts - tree.root_ts > window {
            continue;
        }
        let parent_anchor = record
            .parent_content_id
            .as_deref()
            .and_then(|p| anchors.get(p).copied())
            .unwrap_or(0);

        tree.touch_subreddit(&record.subreddit_context);
        let anchor = if is_tracked(graph, &record.author_id) {
            tree.attach(parent_anchor, record)
        } else {
            parent_anchor
        };
        anchors.insert(id, anchor);
        admit(content, id, &mut frontier, &mut visited);
    }

    Ok(tree.finish(root, severity))
}

type Frontier<'g> = BinaryHeap<Reverse<(DateTime<Utc>, &'g str)>>;

/// Queues the unvisited children of `parent`.
fn admit<'g>(
    content: &'g ContentIndex,
    parent: &str,
    frontier: &mut Frontier<'g>,
    visited: &mut HashSet<&'g str>,
) {
    for child in content.children(parent) {
        if let Some(record) = content.get(child) {
            if visited.insert(record.content_id.as_str()) {
                frontier.push(Reverse((record.timestamp, record.content_id.as_str())));
            }
        }
    }
}

fn is_tracked(graph: &InteractionGraph, user_id: &str) -> bool {
    !user_id.is_empty() && !graph.is_excluded(user_id)
}

struct TreeBuilder {
    root_ts: DateTime<Utc>,
    nodes: Vec<CascadeNode>,
    node_of: HashMap<UserId, usize>,
    edges: Vec<CascadeEdge>,
    subreddits: Vec<String>,
    max_depth: usize,
    max_depth_at: DateTime<Utc>,
    interactions: usize,
}

impl TreeBuilder {
    fn new(root: &ContentRecord) -> Self {
        let mut builder = Self {
            root_ts: root.timestamp,
            nodes: vec![CascadeNode {
                user_id: root.author_id.clone(),
                depth: 0,
                parent_user_id: None,
                first_seen: root.timestamp,
                via_content_id: root.content_id.clone(),
            }],
            node_of: HashMap::from([(root.author_id.clone(), 0)]),
            edges: Vec::new(),
            subreddits: Vec::new(),
            max_depth: 0,
            max_depth_at: root.timestamp,
            interactions: 0,
        };
        builder.touch_subreddit(&root.subreddit_context);
        builder
    }

    /// Records a tracked reply and returns the node later replies anchor to.
    fn attach(&mut self, parent: usize, record: &ContentRecord) -> usize {
        self.interactions += 1;

        if let Some(&existing) = self.node_of.get(&record.author_id) {
            return existing;
        }

        let depth = self.nodes[parent].depth + 1;
        let idx = self.nodes.len();
        self.nodes.push(CascadeNode {
            user_id: record.author_id.clone(),
            depth,
            parent_user_id: Some(self.nodes[parent].user_id.clone()),
            first_seen: record.timestamp,
            via_content_id: record.content_id.clone(),
        });
        self.node_of.insert(record.author_id.clone(), idx);
        self.edges.push(CascadeEdge {
            source_user_id: self.nodes[parent].user_id.clone(),
            target_user_id: record.author_id.clone(),
            content_id: record.content_id.clone(),
            timestamp: record.timestamp,
        });

        if depth > self.max_depth {
            self.max_depth = depth;
            self.max_depth_at = record.timestamp;
        }
        idx
    }

    fn touch_subreddit(&mut self, subreddit: &str) {
        if !subreddit.is_empty() && !self.subreddits.iter().any(|s| s == subreddit) {
            self.subreddits.push(subreddit.to_string());
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn finish(self, root: &ContentRecord, severity: f64) -> Cascade {
        let (time_to_max_depth_hours, velocity) = if self.max_depth == 0 {
            (0.0, 0.0)
        } else {
            let hours = hours_between(self.root_ts, self.max_depth_at);
            (hours, self.max_depth as f64 / hours.max(MIN_ELAPSED_HOURS))
        };

        Cascade {
            root_content_id: root.content_id.clone(),
            root_user_id: root.author_id.clone(),
            root_timestamp: root.timestamp,
            nodes: self.nodes,
            edges: self.edges,
            depth: self.max_depth,
            time_to_max_depth_hours,
            velocity,
            subreddits: self.subreddits,
            severity,
            interaction_count: self.interactions,
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn hours_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}
