// tests/unit_community.rs
use chrono::{TimeZone, Utc};
use infoflow_core::community::{self, Partition};
use infoflow_core::config::CommunityConfig;
use infoflow_core::graph::{self, InteractionGraph};
use infoflow_core::types::InteractionEvent;
use std::collections::BTreeSet;

fn clique(users: &[&str], tag: &str) -> Vec<InteractionEvent> {
    let mut events = Vec::new();
    for a in users {
        for b in users {
            if a != b {
                events.push(InteractionEvent {
                    source_user_id: (*a).into(),
                    target_user_id: (*b).into(),
                    content_id: format!("{tag}-{a}-{b}"),
                    parent_content_id: None,
                    timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
                    subreddit_context: tag.into(),
                    is_flagged: false,
                });
            }
        }
    }
    events
}

fn cliques(n: usize, size: usize, bridged: bool) -> InteractionGraph {
    let mut events = Vec::new();
    for c in 0..n {
        let names: Vec<String> = (0..size).map(|i| format!("g{c}u{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        events.extend(clique(&refs, &format!("t{c}")));
        if bridged && c > 0 {
            let mut link = clique(&[&format!("g{}u0", c - 1), &format!("g{c}u0")], "bridge");
            link.truncate(1);
            events.extend(link);
        }
    }
    graph::build(&events, &BTreeSet::new())
}

fn assert_covers(g: &InteractionGraph, p: &Partition) {
    let mut seen: Vec<String> = p.communities.iter().flat_map(|c| c.members.clone()).collect();
    seen.sort();
    assert_eq!(seen, g.nodes());
}

#[test]
fn test_two_disjoint_five_cliques() {
    let g = cliques(2, 5, false);
    let p = community::partition(&g);
    assert_eq!(p.len(), 2);
    assert!(p.bridge_ratio.values().all(|&r| r == 0.0));
    assert_covers(&g, &p);
}

#[test]
fn test_chain_of_cliques_splits_at_bridges() {
    let g = cliques(4, 5, true);
    let p = community::partition(&g);
    assert_eq!(p.len(), 4);
    assert_covers(&g, &p);
    assert!(p.bridge_ratio_of("g1u0") > 0.0);
    assert_eq!(p.bridge_ratio_of("g1u3"), 0.0);
    assert!(p.modularity > 0.5);
}

#[test]
fn test_same_seed_same_partition() {
    let g = cliques(4, 4, true);
    let config = CommunityConfig {
        seed: 42,
        ..CommunityConfig::default()
    };
    let first = community::partition_with(&g, &config);
    for _ in 0..3 {
        assert_eq!(community::partition_with(&g, &config), first);
    }
}

#[test]
fn test_ids_ordered_by_smallest_member() {
    let p = community::partition(&cliques(3, 3, false));
    for (i, c) in p.communities.iter().enumerate() {
        assert_eq!(c.community_id, i);
    }
    let firsts: Vec<&String> = p.communities.iter().map(|c| &c.members[0]).collect();
    assert!(firsts.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_contributions_sum_to_modularity() {
    let p = community::partition(&cliques(3, 4, true));
    let sum: f64 = p.communities.iter().map(|c| c.modularity_contribution).sum();
    assert!((sum - p.modularity).abs() < 1e-12);
}
