//! End-to-end tests for the `nearby` binary

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// A command isolated from any configuration on the host
fn nearby(dir: &TempDir) -> Command {
    let config = dir.path().join("nearby.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let mut cmd = Command::cargo_bin("nearby").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env("NEARBY_CONFIG", &config);
    cmd
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn write_entities(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("places.json");
    fs::write(
        &path,
        r#"[
            {"name": "Bakery", "latitude": 24.7200, "longitude": 46.6800, "rating": 4.5},
            {"name": "Market", "latitude": 24.7500, "longitude": 46.7000, "rating": 3.0},
            {"name": "Airport", "latitude": 24.9576, "longitude": 46.6988, "rating": 4.8},
            {"name": "Nowhere"}
        ]"#,
    )
    .unwrap();
    path
}

#[test]
fn test_distance_json() {
    let dir = TempDir::new().unwrap();
    let out = json_stdout(nearby(&dir).args(["--json", "distance", "24.7136,46.6753", "21.4858,39.1925"]));

    let km = out["distance_km"].as_f64().unwrap();
    assert!((km - 846.0).abs() < 25.0, "got {km}");
    assert_eq!(out["from"]["latitude"], 24.7136);
    assert!(out.get("approximate_km").is_none());
}

#[test]
fn test_distance_text() {
    let dir = TempDir::new().unwrap();
    nearby(&dir)
        .args(["distance", "0,0", "0,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("111.2 km"));
}

#[test]
fn test_search_json() {
    let dir = TempDir::new().unwrap();
    let entities = write_entities(&dir);
    let out = json_stdout(nearby(&dir).args([
        "--json",
        "search",
        "24.7136,46.6753",
        "--entities",
        entities.to_str().unwrap(),
        "--radius",
        "10",
    ]));

    let names: Vec<&str> = out["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Bakery", "Market"]);
    assert_eq!(out["stats"]["candidates"], 4);
    assert_eq!(out["stats"]["unresolvable"], 1);
    assert!(out["results"][0]["distance_km"].as_f64().unwrap() < 1.0);
}

#[test]
fn test_search_filter_and_k() {
    let dir = TempDir::new().unwrap();
    let entities = write_entities(&dir);
    let out = json_stdout(nearby(&dir).args([
        "--json",
        "search",
        "24.7136,46.6753",
        "-e",
        entities.to_str().unwrap(),
        "-k",
        "1",
        "--filter",
        r#"{"rating": {"$gte": 4.6}}"#,
    ]));

    let results = out["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Airport");
}

#[test]
fn test_search_travel_estimates() {
    let dir = TempDir::new().unwrap();
    let entities = write_entities(&dir);
    let out = json_stdout(nearby(&dir).args([
        "--json",
        "search",
        "24.7136,46.6753",
        "-e",
        entities.to_str().unwrap(),
        "-r",
        "5",
        "--mode",
        "walking",
        "--hour",
        "3",
    ]));

    for result in out["results"].as_array().unwrap() {
        assert!(result["duration_minutes"].as_u64().is_some());
    }
}

#[test]
fn test_invalid_radius_exits_with_input_error() {
    let dir = TempDir::new().unwrap();
    let entities = write_entities(&dir);
    nearby(&dir)
        .args(["--json", "search", "24.7,46.6", "-e", entities.to_str().unwrap(), "--radius=0"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("E4002"));
}

#[test]
fn test_unknown_filter_operator() {
    let dir = TempDir::new().unwrap();
    let entities = write_entities(&dir);
    nearby(&dir)
        .args([
            "--json",
            "search",
            "24.7,46.6",
            "-e",
            entities.to_str().unwrap(),
            "--filter",
            r#"{"rating": {"$near": 4}}"#,
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("E4004"));
}

#[test]
fn test_missing_entities_file() {
    let dir = TempDir::new().unwrap();
    nearby(&dir)
        .args(["search", "24.7,46.6", "-e", "absent.json"])
        .assert()
        .code(4);
}

#[test]
fn test_missing_explicit_config() {
    let dir = TempDir::new().unwrap();
    Command::cargo_bin("nearby")
        .unwrap()
        .current_dir(dir.path())
        .args(["--config", "missing.toml", "distance", "0,0", "1,1"])
        .assert()
        .code(3);
}

#[test]
fn test_config_changes_field_names() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("nearby.toml"),
        "[search]\nlatitude_field = \"lat\"\nlongitude_field = \"lng\"\n",
    )
    .unwrap();
    let entities = dir.path().join("places.json");
    fs::write(&entities, r#"[{"id": 1, "lat": 10.0, "lng": 10.0}]"#).unwrap();

    let out = json_stdout(nearby(&dir).args([
        "--json",
        "search",
        "10,10",
        "-e",
        entities.to_str().unwrap(),
    ]));
    assert_eq!(out["results"][0]["id"], 1);
}

#[test]
fn test_route_polyline() {
    let dir = TempDir::new().unwrap();
    let out = json_stdout(nearby(&dir).args([
        "--json",
        "route",
        "38.5,-120.2",
        "43.252,-126.453",
        "--via",
        "40.7,-120.95",
        "--format",
        "polyline",
        "--mode",
        "driving",
        "--hour",
        "3",
    ]));

    let encoded = out["geometry"].as_str().unwrap();
    assert!(encoded.starts_with("_p~iF~ps|U"), "got {encoded}");
    assert!(out["duration_minutes"].as_u64().unwrap() > 0);
}

#[test]
fn test_route_steps() {
    let dir = TempDir::new().unwrap();
    let out = json_stdout(nearby(&dir).args(["--json", "route", "0,0", "1,0", "--steps", "--hour", "3"]));
    let steps = out["steps"].as_array().unwrap();
    assert!(!steps.is_empty());
}

#[test]
fn test_isochrone_ring() {
    let dir = TempDir::new().unwrap();
    let out = json_stdout(nearby(&dir).args([
        "--json",
        "isochrone",
        "0,0",
        "--minutes",
        "10,20",
        "--mode",
        "walking",
        "--hour",
        "3",
        "--ring",
        "8",
    ]));

    let entries = out["isochrones"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    let r10 = entries[0]["radius_km"].as_f64().unwrap();
    let r20 = entries[1]["radius_km"].as_f64().unwrap();
    assert!(r20 > r10);
}

#[test]
fn test_rejects_out_of_range_coordinate() {
    let dir = TempDir::new().unwrap();
    nearby(&dir)
        .args(["distance", "91,0", "0,0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("latitude"));
}

#[test]
fn test_stats_prints_metrics() {
    let dir = TempDir::new().unwrap();
    nearby(&dir)
        .args(["--stats", "distance", "0,0", "0,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("commands.distance"));
}
