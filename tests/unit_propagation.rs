// tests/unit_propagation.rs
use chrono::{Duration, TimeZone, Utc};
use infoflow_core::graph::{self, Exclusion};
use infoflow_core::propagation::{analyze_cascades, analyze_cascades_with, SkipReason};
use infoflow_core::types::{Annotations, ContentOrigin, InteractionEvent};
use std::collections::BTreeSet;

fn ev(source: &str, target: &str, content: &str, parent: Option<&str>, minutes: i64) -> InteractionEvent {
    InteractionEvent {
        source_user_id: source.into(),
        target_user_id: target.into(),
        content_id: content.into(),
        parent_content_id: parent.map(Into::into),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes),
        subreddit_context: "COVID19".into(),
        is_flagged: false,
    }
}

#[test]
fn test_three_hop_loop_scenario() {
    let events = vec![
        ev("A", "B", "c1", None, 0),
        ev("B", "C", "c2", Some("c1"), 60),
        ev("C", "A", "c3", Some("c2"), 120),
    ];
    let g = graph::build(&events, &BTreeSet::new());
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.edge_count(), 3);
    assert!(g.edges().iter().all(|e| e.weight == 1));

    let cascades = analyze_cascades(&g, &Annotations::from_ids(["c1"]), Duration::hours(72));
    assert_eq!(cascades.len(), 1);
    let c = &cascades[0];
    assert_eq!(c.root_content_id, "c1");
    assert_eq!(c.depth, 2);
    assert!((c.time_to_max_depth_hours - 2.0).abs() < 1e-12);
    assert!((c.velocity - 1.0).abs() < 1e-12);
    assert_eq!(c.subreddits, ["COVID19"]);
}

#[test]
fn test_window_boundary_is_inclusive() {
    let events = vec![
        ev("A", "B", "c1", None, 0),
        ev("B", "A", "c2", Some("c1"), 60),
        ev("C", "B", "c3", Some("c2"), 61),
    ];
    let g = graph::build(&events, &BTreeSet::new());
    let flagged = Annotations::from_ids(["c1"]);
    let c = &analyze_cascades(&g, &flagged, Duration::hours(1))[0];
    assert_eq!(c.size(), 2);
    assert!(!c.contains("C"));
}

#[test]
fn test_flagged_post_roots_cascade() {
    let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
    let origins = vec![ContentOrigin {
        content_id: "p1".into(),
        author_id: "op".into(),
        timestamp: t0,
        subreddit_context: "COVID19".into(),
        is_flagged: true,
    }];
    let events = vec![
        ev("x", "op", "k1", Some("p1"), 30),
        ev("y", "x", "k2", Some("k1"), 90),
    ];
    let g = graph::build_with_origins(&events, &origins, &Exclusion::new());
    let mut flagged = Annotations::new();
    flagged.absorb_event_flags(g.content().flagged_ids());
    let c = &analyze_cascades(&g, &flagged, Duration::hours(72))[0];
    assert_eq!(c.root_user_id, "op");
    assert_eq!(c.depth, 2);
    assert!((c.velocity - 4.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_unreachable_flags_are_skipped() {
    let g = graph::build(&[ev("A", "B", "c1", None, 0)], &BTreeSet::new());
    let set = analyze_cascades_with(
        &g,
        &Annotations::from_ids(["ghost", "c1"]),
        Duration::hours(72),
        true,
    );
    assert_eq!(set.cascades.len(), 1);
    assert_eq!(set.skipped.len(), 1);
    assert_eq!(set.skipped[0].reason, SkipReason::NotFound);
}

#[test]
fn test_severity_carried_on_cascade() {
    let g = graph::build(&[ev("A", "B", "c1", None, 0)], &BTreeSet::new());
    let mut flagged = Annotations::new();
    flagged.flag("c1", 2.5);
    let c = &analyze_cascades(&g, &flagged, Duration::hours(72))[0];
    assert!((c.severity - 2.5).abs() < f64::EPSILON);
    assert_eq!(c.velocity, 0.0);
}
