// tests/unit_config.rs
use infoflow_core::config::{Config, CONFIG_FILE, DEFAULT_COMMUNITY_SEED};
use infoflow_core::error::InfoflowError;
use std::fs;

#[test]
fn test_load_toml() {
    let d = tempfile::tempdir().unwrap();
    let path = d.path().join(CONFIG_FILE);
    fs::write(
        &path,
        "[propagation]\ncascade_window_hours = 24\n[community]\nseed = 99\n[run]\nparallel = false",
    )
    .unwrap();
    let c = Config::load_from(&path).unwrap();
    assert_eq!(c.propagation.cascade_window_hours, 24);
    assert_eq!(c.community.seed, 99);
    assert!(!c.run.parallel);
    assert_eq!(c.graph.deleted_sentinels, ["[deleted]", "[removed]"]);
}

#[test]
fn test_defaults() {
    let c = Config::new();
    assert_eq!(c.propagation.cascade_window_hours, 72);
    assert_eq!(c.community.seed, DEFAULT_COMMUNITY_SEED);
    assert!((c.community.resolution - 1.0).abs() < f64::EPSILON);
    assert_eq!(c.run.top_n, 10);
    assert!(c.run.parallel);
}

#[test]
fn test_missing_file_is_io_error() {
    let d = tempfile::tempdir().unwrap();
    let err = Config::load_from(&d.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, InfoflowError::Io { .. }));
    assert!(!err.is_input_error());
}

#[test]
fn test_malformed_toml_is_input_error() {
    let d = tempfile::tempdir().unwrap();
    let path = d.path().join(CONFIG_FILE);
    fs::write(&path, "[propagation\ncascade_window_hours = ").unwrap();
    let err = Config::load_from(&path).unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn test_zero_window_rejected() {
    let err = Config::parse_toml("[propagation]\ncascade_window_hours = 0").unwrap_err();
    assert!(matches!(err, InfoflowError::InvalidConfig(_)));
}

#[test]
fn test_zero_weights_rejected() {
    let err = Config::parse_toml("[centrality]\ndegree_weight = 0.0\nbetweenness_weight = 0.0")
        .unwrap_err();
    assert!(matches!(err, InfoflowError::InvalidConfig(_)));
}

#[test]
fn test_unequal_weights_normalize() {
    let c = Config::parse_toml("[centrality]\ndegree_weight = 3.0\nbetweenness_weight = 1.0").unwrap();
    assert_eq!(c.centrality.normalized(), (0.75, 0.25));
}

#[test]
fn test_non_finite_weights_rejected() {
    for text in [
        "[centrality]\ndegree_weight = nan",
        "[centrality]\nbetweenness_weight = inf",
        "[centrality]\ndegree_weight = -inf",
    ] {
        let err = Config::parse_toml(text).unwrap_err();
        assert!(matches!(err, InfoflowError::InvalidConfig(_)), "{text}");
    }
}

#[test]
fn test_non_finite_resolution_rejected() {
    for text in ["[community]\nresolution = inf", "[community]\nresolution = nan"] {
        let err = Config::parse_toml(text).unwrap_err();
        assert!(matches!(err, InfoflowError::InvalidConfig(_)), "{text}");
    }
}
