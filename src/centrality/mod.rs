// src/centrality/mod.rs
//! Per-user influence measures over the interaction graph.

pub mod betweenness;
pub mod degree;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::community::Partition;
use crate::graph::InteractionGraph;
use crate::types::UserId;

/// Centrality of one user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CentralityScores {
    pub degree_centrality: f64,
    pub weighted_betweenness_centrality: f64,
    /// Filled in by [`CentralityResult::with_communities`].
    pub community_id: Option<usize>,
}

/// Centrality for every node of one graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CentralityResult {
    pub scores: BTreeMap<UserId, CentralityScores>,
}

/// Computes degree and weighted betweenness for every node.
#[must_use]
pub fn compute(graph: &InteractionGraph) -> CentralityResult {
    compute_with(graph, true)
}

/// As [`compute`], choosing whether components are solved on worker threads.
/// Both modes produce identical results.
#[must_use]
pub fn compute_with(graph: &InteractionGraph, parallel: bool) -> CentralityResult {
    let degree = degree::compute(graph);
    let between = betweenness::compute(graph, parallel);

    let scores = graph
        .nodes()
        .iter()
        .enumerate()
        .map(|(idx, user)| {
            (
                user.clone(),
                CentralityScores {
                    degree_centrality: degree[idx],
                    weighted_betweenness_centrality: between[idx],
                    community_id: None,
                },
            )
        })
        .collect();

    debug!(nodes = graph.node_count(), "centrality computed");
    CentralityResult { scores }
}

impl CentralityResult {
    #[must_use]
    pub fn get(&self, user_id: &str) -> Option<&CentralityScores> {
        self.scores.get(user_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&UserId, &CentralityScores)> {
        self.scores.iter()
    }

    /// Copies community ids from a partition of the same graph.
    #[must_use]
    pub fn with_communities(mut self, partition: &Partition) -> Self {
        for (user, scores) in &mut self.scores {
            scores.community_id = partition.community_id_of(user);
        }
        self
    }

    /// Top `n` users by degree, ties by user id ascending.
    #[must_use]
    pub fn top_by_degree(&self, n: usize) -> Vec<(UserId, f64)> {
        self.top_by(n, |s| s.degree_centrality)
    }

    /// Top `n` users by betweenness, ties by user id ascending.
    #[must_use]
    pub fn top_by_betweenness(&self, n: usize) -> Vec<(UserId, f64)> {
        self.top_by(n, |s| s.weighted_betweenness_centrality)
    }

    fn top_by<F>(&self, n: usize, key: F) -> Vec<(UserId, f64)>
    where
        F: Fn(&CentralityScores) -> f64,
    {
        let mut ranked: Vec<(UserId, f64)> = self
            .scores
            .iter()
            .map(|(user, s)| (user.clone(), key(s)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::graph::test_support::event;
    use std::collections::BTreeSet;

    #[test]
    fn empty_graph_yields_empty_result() {
        let g = build(&[], &BTreeSet::new());
        assert!(compute(&g).is_empty());
    }

    #[test]
    fn ties_rank_by_user_id() {
        // every node of a directed 3-cycle is symmetric
        let events = vec![
            event("c", "a", "1", None, 0),
            event("a", "b", "2", None, 0),
            event("b", "c", "3", None, 0),
        ];
        let g = build(&events, &BTreeSet::new());
        let top = compute(&g).top_by_degree(3);
        let ids: Vec<&str> = top.iter().map(|(u, _)| u.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }
}
