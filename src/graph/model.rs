// src/graph/model.rs
//! The immutable interaction graph and its content index.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{ContentId, UserId};

/// Aggregated directed interactions from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub source: UserId,
    pub target: UserId,
    /// Distinct content items producing this pair.
    pub weight: usize,
    /// Event times, ascending.
    pub timestamps: Vec<DateTime<Utc>>,
}

/// One piece of content, as known to the propagation analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    pub content_id: ContentId,
    pub author_id: UserId,
    /// `None` for top-level posts.
    pub target_id: Option<UserId>,
    pub parent_content_id: Option<ContentId>,
    pub timestamp: DateTime<Utc>,
    pub subreddit_context: String,
    pub is_flagged: bool,
}

/// Content counts for one subreddit. Posts are top-level origins; replies
/// are interaction events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubredditActivity {
    pub posts: usize,
    pub replies: usize,
}

/// Every deduplicated content item with a parent → children index.
///
/// Children lists are ordered by `(timestamp, content_id)`.
#[derive(Debug, Clone, Default)]
pub struct ContentIndex {
    pub(crate) records: BTreeMap<ContentId, ContentRecord>,
    pub(crate) children: BTreeMap<ContentId, Vec<ContentId>>,
}

impl ContentIndex {
    #[must_use]
    pub fn get(&self, content_id: &str) -> Option<&ContentRecord> {
        self.records.get(content_id)
    }

    /// Direct replies to `content_id`, oldest first.
    #[must_use]
    pub fn children(&self, content_id: &str) -> &[ContentId] {
        self.children.get(content_id).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &ContentRecord> {
        self.records.values()
    }

    /// Ids of content marked flagged at ingestion.
    pub fn flagged_ids(&self) -> impl Iterator<Item = &str> {
        self.records
            .values()
            .filter(|r| r.is_flagged)
            .map(|r| r.content_id.as_str())
    }
}

/// Directed, weighted graph of users.
///
/// Nodes are kept sorted by user id so that every index-based traversal
/// visits them in a stable order. Construct it with
/// [`crate::graph::builder::build`]; it is never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct InteractionGraph {
    pub(crate) nodes: Vec<UserId>,
    pub(crate) index: HashMap<UserId, usize>,
    /// Sorted by `(source, target)`.
    pub(crate) edges: Vec<Edge>,
    /// Per node: `(neighbor, edge index)`, ascending by neighbor.
    pub(crate) out_adj: Vec<Vec<(usize, usize)>>,
    pub(crate) in_adj: Vec<Vec<(usize, usize)>>,
    pub(crate) content: ContentIndex,
    pub(crate) excluded: std::collections::BTreeSet<UserId>,
}

impl InteractionGraph {
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// User ids, ascending.
    #[must_use]
    pub fn nodes(&self) -> &[UserId] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn index_of(&self, user_id: &str) -> Option<usize> {
        self.index.get(user_id).copied()
    }

    #[must_use]
    pub fn contains(&self, user_id: &str) -> bool {
        self.index.contains_key(user_id)
    }

    #[must_use]
    pub fn user(&self, idx: usize) -> &str {
        &self.nodes[idx]
    }

    #[must_use]
    pub fn edge(&self, source: &str, target: &str) -> Option<&Edge> {
        let (s, t) = (self.index_of(source)?, self.index_of(target)?);
        self.out_adj[s]
            .iter()
            .find(|(n, _)| *n == t)
            .map(|&(_, e)| &self.edges[e])
    }

    /// Outgoing `(neighbor, weight)` pairs of node `idx`.
    pub fn out_neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.out_adj[idx]
            .iter()
            .map(|&(n, e)| (n, self.edges[e].weight))
    }

    /// Incoming `(neighbor, weight)` pairs of node `idx`.
    pub fn in_neighbors(&self, idx: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.in_adj[idx]
            .iter()
            .map(|&(n, e)| (n, self.edges[e].weight))
    }

    #[must_use]
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_adj[idx].len()
    }

    #[must_use]
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_adj[idx].len()
    }

    /// Total directed edges touching `idx`.
    #[must_use]
    pub fn incident_edge_count(&self, idx: usize) -> usize {
        self.out_degree(idx) + self.in_degree(idx)
    }

    /// Sum of weights over every edge.
    #[must_use]
    pub fn total_weight(&self) -> usize {
        self.edges.iter().map(|e| e.weight).sum()
    }

    /// Directed density `E / (n(n-1))`; zero below two nodes.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn density(&self) -> f64 {
        let n = self.nodes.len();
        if n < 2 {
            return 0.0;
        }
        self.edges.len() as f64 / (n * (n - 1)) as f64
    }

    #[must_use]
    pub fn content(&self) -> &ContentIndex {
        &self.content
    }

    /// Users that were filtered out while building.
    #[must_use]
    pub fn is_excluded(&self, user_id: &str) -> bool {
        self.excluded.contains(user_id)
    }

    /// Posts and replies per subreddit, over all indexed content.
    #[must_use]
    pub fn subreddit_activity(&self) -> BTreeMap<String, SubredditActivity> {
        let mut activity: BTreeMap<String, SubredditActivity> = BTreeMap::new();
        for record in self.content.records() {
            if record.subreddit_context.is_empty() {
                continue;
            }
            let entry = activity.entry(record.subreddit_context.clone()).or_default();
            if record.target_id.is_some() {
                entry.replies += 1;
            } else {
                entry.posts += 1;
            }
        }
        activity
    }
}
