// src/community/mod.rs
//! Community detection and per-user bridge ratios.

pub mod louvain;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use self::louvain::Projection;
use crate::config::CommunityConfig;
use crate::graph::InteractionGraph;
use crate::types::UserId;

/// One detected community.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Community {
    pub community_id: usize,
    /// Ascending user ids.
    pub members: Vec<UserId>,
    /// `L_c / m - γ (d_c / 2m)²` on the undirected projection.
    pub modularity_contribution: f64,
}

/// A partition of every graph node into exactly one community.
///
/// Community ids are dense and ordered by each community's smallest member,
/// so equal partitions always carry equal ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Partition {
    pub communities: Vec<Community>,
    pub membership: BTreeMap<UserId, usize>,
    /// Share of a user's directed edges that leave their community.
    pub bridge_ratio: BTreeMap<UserId, f64>,
    pub modularity: f64,
    pub seed: u64,
}

/// Partitions with the default seed and resolution.
#[must_use]
pub fn partition(graph: &InteractionGraph) -> Partition {
    partition_with(graph, &CommunityConfig::default())
}

#[must_use]
pub fn partition_with(graph: &InteractionGraph, config: &CommunityConfig) -> Partition {
    let projection = Projection::of(graph);
    let raw = louvain::detect(&projection, config);
    let labels = canonical_labels(&raw);

    let mut groups: Vec<Vec<usize>> = Vec::new();
    for (node, &label) in labels.iter().enumerate() {
        if label == groups.len() {
            groups.push(Vec::new());
        }
        groups[label].push(node);
    }

    let contributions = modularity_contributions(&projection, &labels, groups.len(), config.resolution);
    let communities: Vec<Community> = groups
        .iter()
        .zip(&contributions)
        .enumerate()
        .map(|(id, (members, &q))| Community {
            community_id: id,
            members: members.iter().map(|&m| graph.user(m).to_string()).collect(),
            modularity_contribution: q,
        })
        .collect();

    let membership = graph
        .nodes()
        .iter()
        .zip(&labels)
        .map(|(user, &label)| (user.clone(), label))
        .collect();
    let bridge_ratio = bridge_ratios(graph, &labels);
    let modularity = contributions.iter().sum();

    debug!(
        communities = communities.len(),
        modularity, "communities detected"
    );
    Partition {
        communities,
        membership,
        bridge_ratio,
        modularity,
        seed: config.seed,
    }
}

/// Relabels so that ids follow the ascending order of each community's
/// smallest node index. Nodes are sorted by user id, so this is the same
/// as ordering by smallest member id.
fn canonical_labels(raw: &[usize]) -> Vec<usize> {
    let mut map: BTreeMap<usize, usize> = BTreeMap::new();
    raw.iter()
        .map(|&label| {
            let next = map.len();
            *map.entry(label).or_insert(next)
        })
        .collect()
}

fn modularity_contributions(
    projection: &Projection,
    labels: &[usize],
    count: usize,
    resolution: f64,
) -> Vec<f64> {
    let degrees = projection.degrees();
    let two_m: f64 = degrees.iter().sum();
    if two_m <= 0.0 {
        return vec![0.0; count];
    }
    let m = two_m / 2.0;

    let mut internal = vec![0.0; count];
    let mut degree_sum = vec![0.0; count];
    for (i, list) in projection.adj.iter().enumerate() {
        let c = labels[i];
        degree_sum[c] += degrees[i];
        internal[c] += projection.self_loops[i];
        for &(j, w) in list {
            if i < j && labels[j] == c {
                internal[c] += w;
            }
        }
    }

    internal
        .iter()
        .zip(&degree_sum)
        .map(|(l, d)| l / m - resolution * (d / two_m).powi(2))
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn bridge_ratios(graph: &InteractionGraph, labels: &[usize]) -> BTreeMap<UserId, f64> {
    (0..graph.node_count())
        .map(|idx| {
            let total = graph.incident_edge_count(idx);
            let ratio = if total == 0 {
                0.0
            } else {
                let own = labels[idx];
                let crossing = graph
                    .out_neighbors(idx)
                    .chain(graph.in_neighbors(idx))
                    .filter(|&(n, _)| labels[n] != own)
                    .count();
                crossing as f64 / total as f64
            };
            (graph.user(idx).to_string(), ratio)
        })
        .collect()
}

impl Partition {
    #[must_use]
    pub fn community_id_of(&self, user_id: &str) -> Option<usize> {
        self.membership.get(user_id).copied()
    }

    #[must_use]
    pub fn community_of(&self, user_id: &str) -> Option<&Community> {
        self.community_id_of(user_id)
            .and_then(|id| self.communities.get(id))
    }

    /// Zero for users outside the graph.
    #[must_use]
    pub fn bridge_ratio_of(&self, user_id: &str) -> f64 {
        self.bridge_ratio.get(user_id).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    #[must_use]
    pub fn largest_size(&self) -> usize {
        self.communities
            .iter()
            .map(|c| c.members.len())
            .max()
            .unwrap_or(0)
    }
}
