// src/ranking/rationale.rs
//! Explains a risk score as additive contributions.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    DegreeCentrality,
    BetweennessCentrality,
    CommunityBridge,
    CascadeParticipation,
}

impl Factor {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::DegreeCentrality => "degree centrality",
            Self::BetweennessCentrality => "weighted betweenness",
            Self::CommunityBridge => "community bridging",
            Self::CascadeParticipation => "cascade participation",
        }
    }
}

/// One factor's share of a risk score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RationaleFactor {
    pub factor: Factor,
    pub contribution: f64,
}

/// Keeps positive contributions, largest first; equal ones keep factor order.
#[must_use]
pub fn explain(parts: &[(Factor, f64)]) -> Vec<RationaleFactor> {
    let mut factors: Vec<RationaleFactor> = parts
        .iter()
        .filter(|(_, c)| *c > 0.0)
        .map(|&(factor, contribution)| RationaleFactor {
            factor,
            contribution,
        })
        .collect();
    factors.sort_by(|a, b| {
        b.contribution
            .total_cmp(&a.contribution)
            .then(a.factor.cmp(&b.factor))
    });
    factors
}
