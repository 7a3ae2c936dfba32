// tests/cli_exit.rs
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const DUMP: &str = r#"[
  {"content_id": "c1", "source_user_id": "A", "target_user_id": "B",
   "timestamp": "2024-05-01T00:00:00Z", "subreddit_context": "COVID19"},
  {"content_id": "c2", "source_user_id": "B", "target_user_id": "C", "parent_content_id": "c1",
   "timestamp": "2024-05-01T01:00:00Z", "subreddit_context": "COVID19"},
  {"content_id": "c3", "source_user_id": "C", "target_user_id": "A", "parent_content_id": "c2",
   "timestamp": "2024-05-01T02:00:00Z", "subreddit_context": "COVID19"}
]"#;

fn infoflow(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_infoflow"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

fn workspace() -> tempfile::TempDir {
    let d = tempfile::tempdir().unwrap();
    fs::write(d.path().join("events.json"), DUMP).unwrap();
    fs::write(d.path().join("flagged.json"), r#"["c1"]"#).unwrap();
    d
}

#[test]
fn test_analyze_succeeds() {
    let d = workspace();
    let out = infoflow(d.path(), &["analyze", "-i", "events.json", "--flagged", "flagged.json"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("CASCADES"));
}

#[test]
fn test_json_output_parses() {
    let d = workspace();
    let out = infoflow(
        d.path(),
        &["analyze", "-i", "events.json", "--flagged", "flagged.json", "--format", "json"],
    );
    assert_eq!(out.status.code(), Some(0));
    let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let run = &v["runs"][0];
    assert_eq!(run["window_hours"], 72);
    assert_eq!(run["cascades"][0]["depth"], 2);
    assert_eq!(run["ranking"].as_array().unwrap().len(), 3);
}

#[test]
fn test_malformed_dump_exits_2() {
    let d = tempfile::tempdir().unwrap();
    fs::write(d.path().join("bad.json"), "{ not json").unwrap();
    let out = infoflow(d.path(), &["analyze", "-i", "bad.json"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("bad.json"));
}

#[test]
fn test_missing_input_exits_2() {
    let d = tempfile::tempdir().unwrap();
    let out = infoflow(d.path(), &["analyze", "-i", "nowhere"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_zero_window_exits_2() {
    let d = workspace();
    let out = infoflow(d.path(), &["analyze", "-i", "events.json", "--window-hours", "0"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_invalid_config_exits_2() {
    let d = workspace();
    fs::write(d.path().join("infoflow.toml"), "[propagation]\ncascade_window_hours = 0").unwrap();
    let out = infoflow(d.path(), &["config"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_config_prints_toml() {
    let d = tempfile::tempdir().unwrap();
    fs::write(d.path().join("infoflow.toml"), "[community]\nseed = 5").unwrap();
    let out = infoflow(d.path(), &["config"]);
    assert_eq!(out.status.code(), Some(0));
    let text = String::from_utf8_lossy(&out.stdout);
    let parsed: toml::Value = toml::from_str(&text).unwrap();
    assert_eq!(parsed["community"]["seed"].as_integer(), Some(5));
}

#[test]
fn test_ingest_writes_events() {
    let d = workspace();
    let out = infoflow(d.path(), &["ingest", "-i", "events.json", "-o", "out.json"]);
    assert_eq!(out.status.code(), Some(0));
    let written = fs::read_to_string(d.path().join("out.json")).unwrap();
    let events: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(events.as_array().unwrap().len(), 3);
}
