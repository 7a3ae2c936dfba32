// src/propagation/mod.rs
//! Cascade reconstruction for every flagged content item.

pub mod cascade;

pub use cascade::{reconstruct, Cascade, CascadeEdge, CascadeNode, SkipReason};

use chrono::Duration;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::graph::InteractionGraph;
use crate::types::{Annotations, ContentId};

/// A flagged item that produced no cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedContent {
    pub content_id: ContentId,
    pub reason: SkipReason,
}

/// Every cascade of one run, plus the flagged items that yielded none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CascadeSet {
    /// Sorted by root content id.
    pub cascades: Vec<Cascade>,
    pub skipped: Vec<SkippedContent>,
}

/// Cascades for each flagged item, ordered by root content id.
/// Unreachable items are dropped; use [`analyze_cascades_with`] to see them.
#[must_use]
pub fn analyze_cascades(
    graph: &InteractionGraph,
    flagged: &Annotations,
    window: Duration,
) -> Vec<Cascade> {
    analyze_cascades_with(graph, flagged, window, true).cascades
}

/// Reconstructs every cascade, optionally on rayon workers. Output is
/// identical either way. Overlapping cascades stay independent.
#[must_use]
pub fn analyze_cascades_with(
    graph: &InteractionGraph,
    flagged: &Annotations,
    window: Duration,
    parallel: bool,
) -> CascadeSet {
    // BTreeMap keys: already sorted, so collect() preserves root order
    let roots: Vec<(&ContentId, f64)> = flagged.flagged.iter().map(|(id, w)| (id, *w)).collect();
    let trace = |&(id, severity): &(&ContentId, f64)| {
        reconstruct(graph, id, severity, window).map_err(|reason| SkippedContent {
            content_id: id.clone(),
            reason,
        })
    };

    let outcomes: Vec<Result<Cascade, SkippedContent>> = if parallel {
        roots.par_iter().map(trace).collect()
    } else {
        roots.iter().map(trace).collect()
    };

    let mut set = CascadeSet::default();
    for outcome in outcomes {
        match outcome {
            Ok(cascade) => {
                debug!(
                    root = %cascade.root_content_id,
                    depth = cascade.depth,
                    size = cascade.size(),
                    "cascade reconstructed"
                );
                set.cascades.push(cascade);
            }
            Err(skipped) => {
                warn!(content = %skipped.content_id, reason = ?skipped.reason, "flagged content skipped");
                set.skipped.push(skipped);
            }
        }
    }
    set
}

impl CascadeSet {
    #[must_use]
    pub fn len(&self) -> usize {
        self.cascades.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cascades.is_empty()
    }
}
