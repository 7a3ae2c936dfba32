// src/centrality/degree.rs
//! Degree centrality.

use crate::graph::InteractionGraph;

/// Normalized degree per node index: distinct neighbors over `|V| - 1`.
///
/// In- and out-degree are summed, with a reciprocal pair counted once, which
/// keeps every value inside `[0, 1]`. All zeros when `|V| <= 1`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn compute(graph: &InteractionGraph) -> Vec<f64> {
    let n = graph.node_count();
    if n <= 1 {
        return vec![0.0; n];
    }
    let denom = (n - 1) as f64;
    (0..n)
        .map(|idx| distinct_neighbors(graph, idx) as f64 / denom)
        .collect()
}

/// Merges the two ascending adjacency lists, counting shared neighbors once.
fn distinct_neighbors(graph: &InteractionGraph, idx: usize) -> usize {
    let mut out = graph.out_neighbors(idx).map(|(n, _)| n).peekable();
    let mut inc = graph.in_neighbors(idx).map(|(n, _)| n).peekable();
    let mut count = 0;
    loop {
        match (out.peek().copied(), inc.peek().copied()) {
            (Some(a), Some(b)) => {
                count += 1;
                if a <= b {
                    out.next();
                }
                if b <= a {
                    inc.next();
                }
            }
            (Some(_), None) => {
                out.next();
                count += 1;
            }
            (None, Some(_)) => {
                inc.next();
                count += 1;
            }
            (None, None) => return count,
        }
    }
}
