// src/pipeline/mod.rs
//! Orchestration of one analysis run, from events to ranked spreaders.

pub mod metrics;

pub use metrics::{NetworkMetrics, RankedUser};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::cache::RunCache;
use crate::centrality::CentralityResult;
use crate::community::Partition;
use crate::config::{window_from_hours, Config};
use crate::error::Result;
use crate::graph::{self, Exclusion, InteractionGraph};
use crate::propagation::{self, Cascade, SkippedContent};
use crate::ranking::{self, SpreaderScore};
use crate::types::{Annotations, ContentOrigin, InteractionEvent};

/// Flagged-item bookkeeping for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub flagged_requested: usize,
    pub cascades_built: usize,
    pub skipped: Vec<SkippedContent>,
}

/// Everything one run produces, as plain serializable records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub window_hours: u64,
    pub metrics: NetworkMetrics,
    pub centrality: CentralityResult,
    pub partition: Partition,
    pub cascades: Vec<Cascade>,
    pub ranking: Vec<SpreaderScore>,
    pub summary: AnalysisSummary,
    /// SHA-256 of the JSON-serialized ranking.
    pub ranking_digest: String,
}

/// Runs the engine stages with one configuration.
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the graph, dropping configured and pattern-matched accounts.
    ///
    /// # Errors
    /// Returns an error if an exclusion pattern does not compile.
    pub fn build_graph(
        &self,
        events: &[InteractionEvent],
        origins: &[ContentOrigin],
    ) -> Result<InteractionGraph> {
        let exclusion = Exclusion::from_config(&self.config)?;
        let graph = graph::build_with_origins(events, origins, &exclusion);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            excluded = graph.excluded.len(),
            "graph built"
        );
        Ok(graph)
    }

    /// Runs every stage over `graph` with the configured window.
    ///
    /// Flags set on content at ingestion are added to `annotations`.
    ///
    /// # Errors
    /// Returns an error if the ranking cannot be serialized for its digest.
    pub fn run(&self, graph: &InteractionGraph, annotations: &Annotations) -> Result<AnalysisReport> {
        let cache = self.cache(graph);
        self.run_cached(&cache, annotations, self.config.propagation.cascade_window_hours)
    }

    /// One report per window. Centrality and communities are computed once.
    ///
    /// # Errors
    /// Returns the first digest failure.
    pub fn sweep(
        &self,
        graph: &InteractionGraph,
        annotations: &Annotations,
        windows_hours: &[u64],
    ) -> Result<Vec<AnalysisReport>> {
        let cache = self.cache(graph);
        windows_hours
            .iter()
            .map(|&hours| self.run_cached(&cache, annotations, hours))
            .collect()
    }

    #[must_use]
    pub fn cache<'g>(&self, graph: &'g InteractionGraph) -> RunCache<'g> {
        RunCache::new(graph, self.config.community, self.config.run.parallel)
    }

    /// Runs the window-dependent stages, reading the rest from `cache`.
    ///
    /// # Errors
    /// Returns an error if the ranking cannot be serialized for its digest.
    pub fn run_cached(
        &self,
        cache: &RunCache<'_>,
        annotations: &Annotations,
        window_hours: u64,
    ) -> Result<AnalysisReport> {
        let graph = cache.graph();
        let mut flagged = annotations.clone();
        flagged.absorb_event_flags(graph.content().flagged_ids());

        let metrics = NetworkMetrics::collect(cache, self.config.run.top_n);
        let centrality = cache.centrality();
        let partition = cache.partition();

        let set = propagation::analyze_cascades_with(
            graph,
            &flagged,
            window_from_hours(window_hours),
            cache.parallel(),
        );
        let ranking = ranking::rank_with(
            centrality,
            partition,
            &set.cascades,
            &self.config.centrality,
        );
        let ranking_digest = digest(&ranking)?;

        let summary = AnalysisSummary {
            flagged_requested: flagged.len(),
            cascades_built: set.cascades.len(),
            skipped: set.skipped,
        };
        info!(
            window_hours,
            communities = partition.len(),
            cascades = summary.cascades_built,
            skipped = summary.skipped.len(),
            "analysis complete"
        );

        Ok(AnalysisReport {
            window_hours,
            metrics,
            centrality: centrality.clone(),
            partition: partition.clone(),
            cascades: set.cascades,
            ranking,
            summary,
            ranking_digest,
        })
    }
}

/// Hex SHA-256 over the JSON form of `ranking`.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn digest(ranking: &[SpreaderScore]) -> Result<String> {
    let bytes = serde_json::to_vec(ranking)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::event;

    fn triangle() -> Vec<InteractionEvent> {
        vec![
            event("A", "B", "c1", None, 0),
            event("B", "C", "c2", Some("c1"), 1),
            event("C", "A", "c3", Some("c2"), 2),
        ]
    }

    #[test]
    fn ingestion_flags_join_annotations() {
        let mut events = triangle();
        events[0].is_flagged = true;
        let analyzer = Analyzer::new(Config::new());
        let g = analyzer.build_graph(&events, &[]).unwrap();
        let report = analyzer.run(&g, &Annotations::new()).unwrap();
        assert_eq!(report.summary.flagged_requested, 1);
        assert_eq!(report.cascades.len(), 1);
        assert_eq!(report.cascades[0].depth, 2);
    }

    #[test]
    fn sweep_reuses_cache_and_varies_cascades() {
        let analyzer = Analyzer::new(Config::new());
        let g = analyzer.build_graph(&triangle(), &[]).unwrap();
        let flagged = Annotations::from_ids(["c1"]);
        let reports = analyzer.sweep(&g, &flagged, &[1, 72]).unwrap();
        assert_eq!(reports[0].cascades[0].depth, 1);
        assert_eq!(reports[1].cascades[0].depth, 2);
        assert_eq!(reports[0].centrality, reports[1].centrality);
    }

    #[test]
    fn sentinel_accounts_never_become_nodes() {
        let events = vec![
            event("A", "[deleted]", "c1", None, 0),
            event("B", "A", "c2", None, 1),
        ];
        let analyzer = Analyzer::new(Config::new());
        let g = analyzer.build_graph(&events, &[]).unwrap();
        assert!(!g.contains("[deleted]"));
    }

    #[test]
    fn digest_is_stable_hex() {
        let d = digest(&[]).unwrap();
        assert_eq!(d.len(), 64);
        assert_eq!(d, digest(&[]).unwrap());
    }
}
