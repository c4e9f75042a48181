use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::Value;

fn run(dir: &Path, name: &str, extra: &[&str]) -> BTreeMap<String, String> {
    let metrics = dir.join(format!("{name}.json"));
    let bin = env!("CARGO_BIN_EXE_minemesh");
    let status = Command::new(bin)
        .args([
            "--config",
            dir.join("absent.toml").to_str().unwrap(),
            "--radius",
            "1",
            "--seed",
            "9",
            "--workers",
            "2",
            "--metrics",
            metrics.to_str().unwrap(),
        ])
        .args(extra)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("spawn minemesh");
    assert!(status.success(), "minemesh exited with {status}");

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&metrics).expect("metrics written"))
            .expect("metrics json");
    assert!(report["generated_at"].is_string());
    assert!(report["cancelled_passes"].is_u64());
    assert!(report["discarded_results"].is_u64());
    report["sections"]
        .as_array()
        .expect("sections array")
        .iter()
        .map(|section| {
            assert!(section["opaque_quads"].is_u64());
            (
                section["section"].to_string(),
                section["hash"].as_str().expect("hash").to_owned(),
            )
        })
        .collect()
}

#[test]
fn worker_pool_and_sync_runs_agree() {
    let dir = tempfile::tempdir().expect("temp dir");
    let background = run(dir.path(), "background", &[]);
    let sync = run(dir.path(), "sync", &["--sync"]);
    // Only the centre chunk has every neighbour loaded.
    assert!(background.len() >= 2);
    assert!(background
        .keys()
        .all(|section| section.starts_with("[0,") && section.ends_with(",0]")));
    assert_eq!(background, sync);
}

#[test]
fn save_config_writes_overrides() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("config").join("mesher.toml");
    let status = Command::new(env!("CARGO_BIN_EXE_minemesh"))
        .args([
            "--config",
            path.to_str().unwrap(),
            "--radius",
            "2",
            "--full-detail",
            "--save-config",
        ])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .expect("spawn minemesh");
    assert!(status.success());
    let saved = std::fs::read_to_string(&path).expect("config saved");
    assert!(saved.contains("radius = 2"));
    assert!(saved.contains("details = \"full\""));
}
