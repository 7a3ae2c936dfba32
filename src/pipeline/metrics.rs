// src/pipeline/metrics.rs
//! Whole-network summary figures.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::RunCache;
use crate::graph::SubredditActivity;
use crate::types::UserId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedUser {
    pub user_id: UserId,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NetworkMetrics {
    pub num_nodes: usize,
    pub num_edges: usize,
    /// Sum of edge weights: distinct reply content items between tracked users.
    pub total_weight: usize,
    pub density: f64,
    pub component_count: usize,
    pub community_count: usize,
    pub largest_community_size: usize,
    pub modularity: f64,
    pub top_by_degree: Vec<RankedUser>,
    pub top_by_betweenness: Vec<RankedUser>,
    pub subreddit_activity: BTreeMap<String, SubredditActivity>,
}

impl NetworkMetrics {
    /// Reads everything through `cache`, so repeated calls are cheap.
    #[must_use]
    pub fn collect(cache: &RunCache<'_>, top_n: usize) -> Self {
        let graph = cache.graph();
        let partition = cache.partition();
        let centrality = cache.centrality();

        Self {
            num_nodes: graph.node_count(),
            num_edges: graph.edge_count(),
            total_weight: graph.total_weight(),
            density: graph.density(),
            component_count: cache.component_count(),
            community_count: partition.len(),
            largest_community_size: partition.largest_size(),
            modularity: partition.modularity,
            top_by_degree: ranked(centrality.top_by_degree(top_n)),
            top_by_betweenness: ranked(centrality.top_by_betweenness(top_n)),
            subreddit_activity: graph.subreddit_activity(),
        }
    }
}

fn ranked(list: Vec<(UserId, f64)>) -> Vec<RankedUser> {
    list.into_iter()
        .map(|(user_id, score)| RankedUser { user_id, score })
        .collect()
}
