// src/graph/builder.rs
//! Graph construction: deduplication, exclusion and edge aggregation.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::exclusion::Exclusion;
use super::model::{ContentIndex, ContentRecord, Edge, InteractionGraph};
use crate::types::{ContentOrigin, InteractionEvent, UserId};

/// Builds the interaction graph from events, dropping `exclude_ids`.
#[must_use]
pub fn build(events: &[InteractionEvent], exclude_ids: &BTreeSet<UserId>) -> InteractionGraph {
    build_with_origins(events, &[], &Exclusion::from(exclude_ids))
}

/// Builds the graph and a content index that also knows top-level posts.
///
/// Duplicate events (same `content_id`) collapse to the earliest one before
/// any weighting. Content by excluded users stays in the content index so
/// reply chains through deleted comments remain traversable, but those users
/// never become nodes.
#[must_use]
pub fn build_with_origins(
    events: &[InteractionEvent],
    origins: &[ContentOrigin],
    exclusion: &Exclusion,
) -> InteractionGraph {
    let events = dedupe_events(events);
    let content = index_content(&events, origins);

    let mut nodes: BTreeSet<UserId> = BTreeSet::new();
    let mut excluded: BTreeSet<UserId> = BTreeSet::new();
    let mut pairs: BTreeMap<(UserId, UserId), Vec<DateTime<Utc>>> = BTreeMap::new();

    for event in &events {
        let source_out = exclusion.is_excluded(&event.source_user_id);
        let target_out = exclusion.is_excluded(&event.target_user_id);
        if source_out {
            excluded.insert(event.source_user_id.clone());
        }
        if target_out {
            excluded.insert(event.target_user_id.clone());
        }
        if source_out || target_out {
            continue;
        }

        nodes.insert(event.source_user_id.clone());
        nodes.insert(event.target_user_id.clone());
        if event.is_self_reply() {
            continue;
        }
        pairs
            .entry((event.source_user_id.clone(), event.target_user_id.clone()))
            .or_default()
            .push(event.timestamp);
    }
    excluded.remove("");

    let graph = assemble(nodes, pairs, content, excluded);
    debug!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        content = graph.content.len(),
        "interaction graph built"
    );
    graph
}

/// Keeps one event per `content_id`: the earliest, then the smallest
/// `(source, target)` for identical timestamps.
fn dedupe_events(events: &[InteractionEvent]) -> Vec<InteractionEvent> {
    let mut sorted: Vec<&InteractionEvent> = events.iter().collect();
    sorted.sort_by(|a, b| {
        a.content_id
            .cmp(&b.content_id)
            .then(a.timestamp.cmp(&b.timestamp))
            .then_with(|| a.source_user_id.cmp(&b.source_user_id))
            .then_with(|| a.target_user_id.cmp(&b.target_user_id))
    });
    sorted.dedup_by(|a, b| a.content_id == b.content_id);
    sorted.into_iter().cloned().collect()
}

fn index_content(events: &[InteractionEvent], origins: &[ContentOrigin]) -> ContentIndex {
    let mut records: BTreeMap<String, ContentRecord> = BTreeMap::new();

    for event in events {
        records.insert(
            event.content_id.clone(),
            ContentRecord {
                content_id: event.content_id.clone(),
                author_id: event.source_user_id.clone(),
                target_id: Some(event.target_user_id.clone()),
                parent_content_id: event.parent_content_id.clone(),
                timestamp: event.timestamp,
                subreddit_context: event.subreddit_context.clone(),
                is_flagged: event.is_flagged,
            },
        );
    }

    // Interactions win over origins that share an id.
    let mut origins: Vec<&ContentOrigin> = origins.iter().collect();
    origins.sort_by(|a, b| a.content_id.cmp(&b.content_id).then(a.timestamp.cmp(&b.timestamp)));
    for origin in origins {
        records
            .entry(origin.content_id.clone())
            .or_insert_with(|| ContentRecord {
                content_id: origin.content_id.clone(),
                author_id: origin.author_id.clone(),
                target_id: None,
                parent_content_id: None,
                timestamp: origin.timestamp,
                subreddit_context: origin.subreddit_context.clone(),
                is_flagged: origin.is_flagged,
            });
    }

    let mut children: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in records.values() {
        if let Some(parent) = &record.parent_content_id {
            if parent != &record.content_id {
                children
                    .entry(parent.clone())
                    .or_default()
                    .push(record.content_id.clone());
            }
        }
    }
    for list in children.values_mut() {
        list.sort_by(|a, b| {
            let (ra, rb) = (&records[a], &records[b]);
            ra.timestamp.cmp(&rb.timestamp).then_with(|| a.cmp(b))
        });
    }

    ContentIndex { records, children }
}

fn assemble(
    nodes: BTreeSet<UserId>,
    pairs: BTreeMap<(UserId, UserId), Vec<DateTime<Utc>>>,
    content: ContentIndex,
    excluded: BTreeSet<UserId>,
) -> InteractionGraph {
    let nodes: Vec<UserId> = nodes.into_iter().collect();
    let index: HashMap<UserId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();

    let mut out_adj = vec![Vec::new(); nodes.len()];
    let mut in_adj = vec![Vec::new(); nodes.len()];
    let mut edges = Vec::with_capacity(pairs.len());

    // BTreeMap order keeps `edges` sorted and each adjacency list ascending.
    for ((source, target), mut timestamps) in pairs {
        timestamps.sort();
        let (s, t) = (index[&source], index[&target]);
        let e = edges.len();
        out_adj[s].push((t, e));
        in_adj[t].push((s, e));
        edges.push(Edge {
            source,
            target,
            weight: timestamps.len(),
            timestamps,
        });
    }
    for list in &mut in_adj {
        list.sort_unstable();
    }

    InteractionGraph {
        nodes,
        index,
        edges,
        out_adj,
        in_adj,
        content,
        excluded,
    }
}
