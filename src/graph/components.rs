// src/graph/components.rs
//! Weakly connected components.

use super::model::InteractionGraph;
use super::union_find::UnionFind;

/// Groups node indices by weakly connected component.
///
/// Each component is sorted ascending and components are ordered by their
/// smallest member, so output depends only on the graph.
#[must_use]
pub fn weakly_connected(graph: &InteractionGraph) -> Vec<Vec<usize>> {
    let n = graph.node_count();
    let mut uf = UnionFind::new(n);
    for s in 0..n {
        for (t, _) in graph.out_neighbors(s) {
            uf.union(s, t);
        }
    }

    let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
    let mut components: Vec<Vec<usize>> = Vec::new();
    // Ascending scan: a component is opened by its smallest member.
    for node in 0..n {
        let root = uf.find(node);
        match slot_of_root[root] {
            Some(slot) => components[slot].push(node),
            None => {
                slot_of_root[root] = Some(components.len());
                components.push(vec![node]);
            }
        }
    }
    components
}
