// src/ranking/mod.rs
//! Spreader ranking: combines centrality, community bridging and cascade
//! participation into one risk score per user.

pub mod rationale;

pub use rationale::{Factor, RationaleFactor};

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::centrality::CentralityResult;
use crate::community::Partition;
use crate::config::CentralityWeighting;
use crate::propagation::Cascade;
use crate::types::UserId;

/// Risk assessment for one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreaderScore {
    pub user_id: UserId,
    pub influence_score: f64,
    pub community_id: Option<usize>,
    pub community_bridge_score: f64,
    pub cascade_participation_count: usize,
    /// Participation summed over cascade severities.
    pub weighted_participation: f64,
    pub risk_score: f64,
    /// Non-zero factors, largest contribution first.
    pub rationale: Vec<RationaleFactor>,
}

/// Ranks with equal degree and betweenness weights.
#[must_use]
pub fn rank(
    centrality: &CentralityResult,
    partition: &Partition,
    cascades: &[Cascade],
) -> Vec<SpreaderScore> {
    rank_with(centrality, partition, cascades, &CentralityWeighting::default())
}

/// Scores every user in `centrality`, highest risk first, ties by user id.
///
/// `risk = influence * (1 + bridge) * (1 + ln(1 + p))` where `influence` is
/// the weighted centrality sum and `p` the severity-weighted number of
/// cascades the user took part in.
#[must_use]
pub fn rank_with(
    centrality: &CentralityResult,
    partition: &Partition,
    cascades: &[Cascade],
    weighting: &CentralityWeighting,
) -> Vec<SpreaderScore> {
    let (wd, wb) = weighting.normalized();
    let participation = participation(cascades);

    let mut scores: Vec<SpreaderScore> = centrality
        .iter()
        .map(|(user, c)| {
            let (count, weighted) = participation.get(user.as_str()).copied().unwrap_or((0, 0.0));
            let bridge = partition.bridge_ratio_of(user);

            let degree_part = wd * c.degree_centrality;
            let betweenness_part = wb * c.weighted_betweenness_centrality;
            let influence = degree_part + betweenness_part;
            let bridge_part = influence * bridge;
            let cascade_part = influence * (1.0 + bridge) * weighted.ln_1p();
            let risk = influence * (1.0 + bridge) * (1.0 + weighted.ln_1p());

            SpreaderScore {
                user_id: user.clone(),
                influence_score: influence,
                community_id: partition.community_id_of(user),
                community_bridge_score: bridge,
                cascade_participation_count: count,
                weighted_participation: weighted,
                risk_score: risk,
                rationale: rationale::explain(&[
                    (Factor::DegreeCentrality, degree_part),
                    (Factor::BetweennessCentrality, betweenness_part),
                    (Factor::CommunityBridge, bridge_part),
                    (Factor::CascadeParticipation, cascade_part),
                ]),
            }
        })
        .collect();

    scores.sort_by(|a, b| {
        b.risk_score
            .total_cmp(&a.risk_score)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    debug!(users = scores.len(), "spreaders ranked");
    scores
}

/// Per user: cascades joined and their summed severity.
fn participation(cascades: &[Cascade]) -> BTreeMap<&str, (usize, f64)> {
    let mut totals: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for cascade in cascades {
        for user in cascade.participants() {
            let entry = totals.entry(user).or_default();
            entry.0 += 1;
            entry.1 += cascade.severity;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::centrality;
    use crate::community::partition;
    use crate::graph::build;
    use crate::graph::test_support::event;
    use crate::propagation::analyze_cascades;
    use crate::types::Annotations;
    use chrono::Duration;
    use std::collections::BTreeSet;

    fn chain() -> Vec<crate::types::InteractionEvent> {
        vec![
            event("A", "B", "c1", None, 0),
            event("B", "C", "c2", Some("c1"), 1),
            event("C", "A", "c3", Some("c2"), 2),
            event("D", "C", "c4", None, 3),
        ]
    }

    #[test]
    fn risk_is_sum_of_rationale() {
        let g = build(&chain(), &BTreeSet::new());
        let c = centrality::compute(&g);
        let p = partition(&g);
        let cascades = analyze_cascades(&g, &Annotations::from_ids(["c1"]), Duration::hours(72));
        for s in rank(&c, &p, &cascades) {
            let total: f64 = s.rationale.iter().map(|f| f.contribution).sum();
            assert!((total - s.risk_score).abs() < 1e-12, "{}", s.user_id);
        }
    }

    #[test]
    fn participation_raises_risk() {
        let g = build(&chain(), &BTreeSet::new());
        let c = centrality::compute(&g);
        let p = partition(&g);
        let none = rank(&c, &p, &[]);
        let cascades = analyze_cascades(&g, &Annotations::from_ids(["c1"]), Duration::hours(72));
        let some = rank(&c, &p, &cascades);
        let risk = |v: &[SpreaderScore], u: &str| v.iter().find(|s| s.user_id == u).unwrap().risk_score;
        assert!(risk(&some, "B") > risk(&none, "B"));
        assert!((risk(&some, "D") - risk(&none, "D")).abs() < 1e-12);
        let b = some.iter().find(|s| s.user_id == "B").unwrap();
        assert_eq!(b.cascade_participation_count, 1);
    }

    #[test]
    fn ordering_is_descending_with_id_ties() {
        let g = build(&chain(), &BTreeSet::new());
        let ranked = rank(&centrality::compute(&g), &partition(&g), &[]);
        for pair in ranked.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            assert!(
                a.risk_score > b.risk_score
                    || (a.risk_score == b.risk_score && a.user_id < b.user_id)
            );
        }
    }

    #[test]
    fn rank_is_idempotent() {
        let g = build(&chain(), &BTreeSet::new());
        let c = centrality::compute(&g);
        let p = partition(&g);
        let cascades = analyze_cascades(&g, &Annotations::from_ids(["c1"]), Duration::hours(72));
        assert_eq!(rank(&c, &p, &cascades), rank(&c, &p, &cascades));
    }

    #[test]
    fn degree_only_weighting_ignores_betweenness() {
        let g = build(&chain(), &BTreeSet::new());
        let c = centrality::compute(&g);
        let weighting = CentralityWeighting {
            degree_weight: 1.0,
            betweenness_weight: 0.0,
        };
        for s in rank_with(&c, &partition(&g), &[], &weighting) {
            let degree = c.get(&s.user_id).unwrap().degree_centrality;
            assert!((s.influence_score - degree).abs() < 1e-12);
        }
    }
}
