//! CLI command integration tests.
//! Each test writes its input into a temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn clusterkit() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("clusterkit").unwrap()
}

#[test]
fn embeddings_command_prints_clusters() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("embeddings.json");

    let mut items = Vec::new();
    for i in 0..4 {
        items.push(serde_json::json!({ "id": format!("x{i}"), "vector": [1.0, 0.01 * i as f64] }));
        items.push(serde_json::json!({ "id": format!("y{i}"), "vector": [0.01 * i as f64, 1.0] }));
    }
    std::fs::write(&input, serde_json::to_string(&items).unwrap()).unwrap();

    let output = clusterkit()
        .arg("embeddings")
        .arg(&input)
        .args(["--min-cluster-size", "3"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["clusters"].as_array().unwrap().len(), 2);
    assert_eq!(parsed["outliers"].as_array().unwrap().len(), 0);
}

fn write_ensemble(dir: &TempDir) -> std::path::PathBuf {
    let input = dir.path().join("grids.json");

    let mut grids = Vec::new();
    for m in 0..3 {
        let mut rows = vec![vec![0.0; 12]; 10];
        for row in rows.iter_mut().take(3) {
            row[m] = 9.0;
            row[m + 1] = 9.0;
        }
        for row in rows.iter_mut().skip(5).take(4) {
            for cell in row.iter_mut().skip(6).take(5) {
                *cell = 15.0;
            }
        }
        grids.push(rows);
    }
    std::fs::write(&input, serde_json::to_string(&grids).unwrap()).unwrap();
    input
}

#[test]
fn grids_command_reports_summaries() {
    let dir = TempDir::new().unwrap();
    let input = write_ensemble(&dir);

    clusterkit()
        .arg("grids")
        .arg(&input)
        .args(["--k", "2", "--seed", "42", "--min-area", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"objects\": 6"))
        .stdout(predicate::str::contains("\"k\": 2"));
}

#[test]
fn grids_command_with_same_seed_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let input = write_ensemble(&dir);

    let run = || {
        clusterkit()
            .arg("grids")
            .arg(&input)
            .args(["--k", "3", "--seed", "9"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    assert_eq!(run(), run());
}

#[test]
fn grids_command_accepts_partial_config() {
    let dir = TempDir::new().unwrap();
    let input = write_ensemble(&dir);
    let config = dir.path().join("config.json");
    std::fs::write(&config, r#"{ "normalize": false, "seed": 3 }"#).unwrap();

    let output = clusterkit()
        .arg("grids")
        .arg(&input)
        .args(["--k", "2", "--min-area", "2", "--config"])
        .arg(&config)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["k"], 2);
    assert_eq!(parsed["objects"], 6);
}

#[test]
fn rust_log_level_is_respected() {
    let dir = TempDir::new().unwrap();
    let input = write_ensemble(&dir);

    clusterkit()
        .env("RUST_LOG", "info")
        .arg("grids")
        .arg(&input)
        .args(["--k", "2", "--seed", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("extracted objects"));

    clusterkit()
        .env_remove("RUST_LOG")
        .arg("grids")
        .arg(&input)
        .args(["--k", "2", "--seed", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("extracted objects").not());
}

#[test]
fn grids_command_with_no_objects() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("grids.json");
    std::fs::write(&input, "[[[0.0, 0.0], [0.0, 0.0]]]").unwrap();

    clusterkit()
        .arg("grids")
        .arg(&input)
        .args(["--k", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"objects\": 0"));
}

#[test]
fn ragged_grid_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("grids.json");
    std::fs::write(&input, "[[[1.0, 2.0], [3.0]]]").unwrap();

    clusterkit()
        .arg("grids")
        .arg(&input)
        .args(["--k", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Grid 0 is malformed"));
}

#[test]
fn missing_input_file_fails() {
    clusterkit()
        .args(["embeddings", "/definitely/not/here.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}
