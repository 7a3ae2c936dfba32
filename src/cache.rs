// src/cache.rs
//! Run-scoped read-through cache for window-independent results.
//!
//! Centrality, the community partition and the component count depend only
//! on the graph, so a window sweep computes them once. The cache borrows the
//! graph and lives no longer than one run; nothing is shared across runs.

use std::sync::OnceLock;

use crate::centrality::{self, CentralityResult};
use crate::community::{self, Partition};
use crate::config::CommunityConfig;
use crate::graph::{components, InteractionGraph};

pub struct RunCache<'g> {
    graph: &'g InteractionGraph,
    community: CommunityConfig,
    parallel: bool,
    centrality: OnceLock<CentralityResult>,
    partition: OnceLock<Partition>,
    component_count: OnceLock<usize>,
}

impl<'g> RunCache<'g> {
    #[must_use]
    pub fn new(graph: &'g InteractionGraph, community: CommunityConfig, parallel: bool) -> Self {
        Self {
            graph,
            community,
            parallel,
            centrality: OnceLock::new(),
            partition: OnceLock::new(),
            component_count: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn graph(&self) -> &'g InteractionGraph {
        self.graph
    }

    #[must_use]
    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn partition(&self) -> &Partition {
        self.partition
            .get_or_init(|| community::partition_with(self.graph, &self.community))
    }

    /// Centrality with community ids attached.
    pub fn centrality(&self) -> &CentralityResult {
        self.centrality.get_or_init(|| {
            centrality::compute_with(self.graph, self.parallel).with_communities(self.partition())
        })
    }

    pub fn component_count(&self) -> usize {
        *self
            .component_count
            .get_or_init(|| components::weakly_connected(self.graph).len())
    }

    /// True once centrality has been computed.
    #[must_use]
    pub fn is_warm(&self) -> bool {
        self.centrality.get().is_some()
    }
}
