// src/centrality/betweenness.rs
//! Weighted betweenness centrality (Brandes, Dijkstra variant).
//!
//! Edge weight counts interactions, so a heavier edge is a stronger tie and
//! a shorter hop: distance = 1 / weight. Each weakly connected component is
//! solved on its own, so a node's score only ever reflects paths inside its
//! component. Every score is scaled by the whole graph's `(n-1)(n-2)`, which
//! keeps nodes in different components comparable.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use rayon::prelude::*;

use crate::graph::components;
use crate::graph::InteractionGraph;

/// Relative tolerance for treating two path lengths as equal.
const DIST_EPSILON: f64 = 1e-9;

/// Normalized betweenness per node index, in `[0, 1]`.
#[must_use]
pub fn compute(graph: &InteractionGraph, parallel: bool) -> Vec<f64> {
    let comps = components::weakly_connected(graph);
    let scale = graph_scale(graph.node_count());

    let per_component: Vec<Vec<(usize, f64)>> = if parallel {
        comps.par_iter().map(|c| component_scores(graph, c, scale)).collect()
    } else {
        comps.iter().map(|c| component_scores(graph, c, scale)).collect()
    };

    let mut scores = vec![0.0; graph.node_count()];
    for (node, value) in per_component.into_iter().flatten() {
        scores[node] = value;
    }
    scores
}

/// `1 / ((n-1)(n-2))`, the number of ordered pairs excluding the node itself.
#[allow(clippy::cast_precision_loss)]
fn graph_scale(n: usize) -> f64 {
    if n <= 2 {
        return 0.0;
    }
    1.0 / ((n - 1) * (n - 2)) as f64
}

#[allow(clippy::cast_precision_loss)]
fn component_scores(graph: &InteractionGraph, members: &[usize], scale: f64) -> Vec<(usize, f64)> {
    let c = members.len();
    if c <= 2 {
        return members.iter().map(|&m| (m, 0.0)).collect();
    }

    let local: HashMap<usize, usize> = members.iter().enumerate().map(|(i, &m)| (m, i)).collect();
    let adjacency: Vec<Vec<(usize, f64)>> = members
        .iter()
        .map(|&m| {
            graph
                .out_neighbors(m)
                .map(|(n, w)| (local[&n], 1.0 / w as f64))
                .collect()
        })
        .collect();

    let mut bc = vec![0.0; c];
    for source in 0..c {
        accumulate_from(source, &adjacency, &mut bc);
    }

    members
        .iter()
        .zip(bc)
        .map(|(&m, b)| (m, b * scale))
        .collect()
}

/// One Brandes iteration: single-source shortest paths, then dependency
/// back-propagation into `bc`.
fn accumulate_from(source: usize, adjacency: &[Vec<(usize, f64)>], bc: &mut [f64]) {
    let n = adjacency.len();
    let mut stack: Vec<usize> = Vec::with_capacity(n);
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut sigma = vec![0.0_f64; n];
    let mut dist = vec![f64::INFINITY; n];
    let mut settled = vec![false; n];

    sigma[source] = 1.0;
    dist[source] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(Frontier { dist: 0.0, node: source });

    while let Some(Frontier { dist: d, node: v }) = heap.pop() {
        if settled[v] {
            continue;
        }
        settled[v] = true;
        stack.push(v);

        for &(w, len) in &adjacency[v] {
            if settled[w] {
                continue;
            }
            let candidate = d + len;
            let tol = DIST_EPSILON * candidate.max(1.0);
            if candidate < dist[w] - tol {
                dist[w] = candidate;
                sigma[w] = sigma[v];
                preds[w].clear();
                preds[w].push(v);
                heap.push(Frontier { dist: candidate, node: w });
            } else if (candidate - dist[w]).abs() <= tol {
                sigma[w] += sigma[v];
                preds[w].push(v);
            }
        }
    }

    let mut delta = vec![0.0_f64; n];
    while let Some(w) = stack.pop() {
        for &v in &preds[w] {
            delta[v] += (sigma[v] / sigma[w]) * (1.0 + delta[w]);
        }
        if w != source {
            bc[w] += delta[w];
        }
    }
}

/// Min-heap entry ordered by distance, then node index.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Frontier {
    dist: f64,
    node: usize,
}

impl Eq for Frontier {}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .total_cmp(&self.dist)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
