// src/community/louvain.rs
//! Seeded multi-level Louvain modularity optimization.
//!
//! Variant: classic two-phase Louvain (Blondel et al. 2008) on the undirected
//! projection. Phase 1 visits nodes in an order shuffled once per level by a
//! `StdRng` seeded from the config, and moves each node to the neighboring
//! community with the largest strictly positive gain over staying put,
//! scanning candidate communities in ascending id order. Phase 2 collapses
//! communities into weighted super-nodes. Same graph + same seed gives the
//! same labels.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::CommunityConfig;
use crate::graph::InteractionGraph;

/// Minimum modularity gain (in link-weight units) that justifies a move.
const GAIN_EPSILON: f64 = 1e-12;

/// Undirected weighted graph; `adj` excludes self-loops, which live in
/// `self_loops`.
#[derive(Debug, Clone)]
pub(crate) struct Projection {
    pub adj: Vec<Vec<(usize, f64)>>,
    pub self_loops: Vec<f64>,
}

impl Projection {
    /// Collapses direction: the undirected weight of `{a, b}` is the sum of
    /// both directed weights.
    #[allow(clippy::cast_precision_loss)]
    pub fn of(graph: &InteractionGraph) -> Self {
        let n = graph.node_count();
        let mut pairs: BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for s in 0..n {
            for (t, w) in graph.out_neighbors(s) {
                let key = if s < t { (s, t) } else { (t, s) };
                *pairs.entry(key).or_default() += w as f64;
            }
        }
        let mut adj = vec![Vec::new(); n];
        for ((a, b), w) in pairs {
            adj[a].push((b, w));
            adj[b].push((a, w));
        }
        for list in &mut adj {
            list.sort_by_key(|&(n, _)| n);
        }
        Self {
            adj,
            self_loops: vec![0.0; n],
        }
    }

    pub fn len(&self) -> usize {
        self.adj.len()
    }

    /// Weighted degree; a self-loop counts twice.
    pub fn degrees(&self) -> Vec<f64> {
        self.adj
            .iter()
            .zip(&self.self_loops)
            .map(|(list, s)| list.iter().map(|(_, w)| w).sum::<f64>() + 2.0 * s)
            .collect()
    }
}

/// Community label per node of `projection`. Labels are arbitrary integers;
/// callers canonicalize them.
pub(crate) fn detect(projection: &Projection, config: &CommunityConfig) -> Vec<usize> {
    let n = projection.len();
    let mut membership: Vec<usize> = (0..n).collect();
    let two_m: f64 = projection.degrees().iter().sum();
    if n == 0 || two_m <= 0.0 {
        return membership;
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut level = projection.clone();

    for depth in 0..config.max_levels {
        let (labels, moved) = local_moving(&level, config, two_m, &mut rng);
        if !moved {
            break;
        }
        let (dense, count) = renumber(&labels);
        for label in &mut membership {
            *label = dense[*label];
        }
        tracing::trace!(depth, communities = count, "louvain level aggregated");
        if count == level.len() {
            break;
        }
        level = aggregate(&level, &dense, count);
    }
    membership
}

fn local_moving(
    g: &Projection,
    config: &CommunityConfig,
    two_m: f64,
    rng: &mut StdRng,
) -> (Vec<usize>, bool) {
    let n = g.len();
    let k = g.degrees();
    let mut comm: Vec<usize> = (0..n).collect();
    let mut tot = k.clone();
    let mut order: Vec<usize> = (0..n).collect();
    order.shuffle(rng);

    let gamma = config.resolution;
    let mut moved_any = false;

    for _ in 0..config.max_passes {
        let mut moved = false;
        for &i in &order {
            let current = comm[i];
            let mut links: BTreeMap<usize, f64> = BTreeMap::new();
            for &(j, w) in &g.adj[i] {
                *links.entry(comm[j]).or_default() += w;
            }

            tot[current] -= k[i];
            let stay = links.get(&current).copied().unwrap_or(0.0);
            let mut best = current;
            let mut best_gain = stay - gamma * tot[current] * k[i] / two_m;
            for (&c, &w) in &links {
                if c == current {
                    continue;
                }
                let gain = w - gamma * tot[c] * k[i] / two_m;
                if gain > best_gain + GAIN_EPSILON {
                    best = c;
                    best_gain = gain;
                }
            }
            tot[best] += k[i];
            comm[i] = best;

            if best != current {
                moved = true;
                moved_any = true;
            }
        }
        if !moved {
            break;
        }
    }
    (comm, moved_any)
}

/// Maps labels to `0..count` in order of first appearance.
fn renumber(labels: &[usize]) -> (Vec<usize>, usize) {
    let mut map: Vec<Option<usize>> = vec![None; labels.len()];
    let mut next = 0;
    let dense = labels
        .iter()
        .map(|&l| {
            *map[l].get_or_insert_with(|| {
                next += 1;
                next - 1
            })
        })
        .collect();
    (dense, next)
}

fn aggregate(g: &Projection, dense: &[usize], count: usize) -> Projection {
    let mut links: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
    let mut self_loops = vec![0.0; count];

    for (i, list) in g.adj.iter().enumerate() {
        let ci = dense[i];
        self_loops[ci] += g.self_loops[i];
        for &(j, w) in list {
            let cj = dense[j];
            if ci == cj {
                // each undirected edge appears in both lists; count it once
                if i < j {
                    self_loops[ci] += w;
                }
            } else {
                *links[ci].entry(cj).or_default() += w;
            }
        }
    }

    Projection {
        adj: links.into_iter().map(|m| m.into_iter().collect()).collect(),
        self_loops,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build;
    use crate::graph::test_support::{clique, event};
    use std::collections::BTreeSet;

    #[test]
    fn projection_sums_both_directions() {
        let events = vec![event("a", "b", "1", None, 0), event("b", "a", "2", None, 0)];
        let g = build(&events, &BTreeSet::new());
        let p = Projection::of(&g);
        assert_eq!(p.adj[0], vec![(1, 2.0)]);
        assert_eq!(p.degrees(), vec![2.0, 2.0]);
    }

    #[test]
    fn edgeless_graph_keeps_singletons() {
        let g = build(&[event("a", "a", "1", None, 0)], &BTreeSet::new());
        let labels = detect(&Projection::of(&g), &CommunityConfig::default());
        assert_eq!(labels, vec![0]);
    }

    #[test]
    fn same_seed_same_labels() {
        let mut events = clique(&["a", "b", "c", "d"], "x");
        events.extend(clique(&["e", "f", "g"], "y"));
        events.push(event("d", "e", "bridge", None, 1));
        let g = build(&events, &BTreeSet::new());
        let p = Projection::of(&g);
        let cfg = CommunityConfig::default();
        assert_eq!(detect(&p, &cfg), detect(&p, &cfg));
    }

    #[test]
    fn renumber_is_first_appearance_order() {
        assert_eq!(renumber(&[4, 4, 1, 4, 2]), (vec![0, 0, 1, 0, 2], 3));
    }
}
