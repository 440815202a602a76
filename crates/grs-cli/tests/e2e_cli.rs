//! End-to-end tests for the `grs` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn grs_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("grs"));
    cmd.current_dir(dir);
    cmd.env("GRS_LOG", "error");
    cmd.env_remove("GRS_FORMAT");
    cmd
}

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

fn triangle(dir: &Path) -> PathBuf {
    write_file(dir, "triangle.csv", "source,target\n1,2\n2,3\n3,1\n")
}

fn json_stdout(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("grs should not crash");
    assert!(
        output.status.success(),
        "grs failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

fn json_stderr_error(cmd: &mut Command) -> Value {
    let output = cmd.output().expect("grs should not crash");
    assert!(!output.status.success(), "command unexpectedly succeeded");
    let value: Value = serde_json::from_slice(&output.stderr).expect("valid JSON error");
    value["error"].clone()
}

/// Exact curvature comes from an iterative solver, so compare to 1e-3.
fn approx(value: &Value, expected: f64) {
    let actual = value.as_f64().expect("number");
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn score_triangle_json() {
    let dir = TempDir::new().expect("tempdir");
    let file = triangle(dir.path());

    let report = json_stdout(grs_cmd(dir.path()).arg("score").arg(&file).arg("--json"));
    assert_eq!(report["graph"]["nodes"], 3);
    assert_eq!(report["graph"]["edges"], 3);
    approx(&report["spectral_gap"], 3.0);
    approx(&report["singular_value_variance"], 2.0 / 9.0);
    approx(&report["curvature"], 0.75);
    approx(&report["score"], 3.0 - 2.0 / 9.0 + 0.75);
    assert_eq!(report["curvature_source"], "ollivier_ricci");
    assert!(report["fallback"].is_null());
    assert_eq!(report["preset"], "weighted");
}

#[test]
fn score_proxy_legacy_scales_curvature() {
    let dir = TempDir::new().expect("tempdir");
    let file = triangle(dir.path());

    let report = json_stdout(grs_cmd(dir.path()).arg("score").arg(&file).args([
        "--curvature",
        "proxy",
        "--preset",
        "legacy",
        "--w3",
        "0",
        "--format",
        "json",
    ]));
    assert_eq!(report["curvature_source"], "clustering_proxy");
    approx(&report["curvature"], 1.0);
    approx(&report["curvature_scale"], 10.0);
    approx(&report["score"], 3.0 - 2.0 / 9.0 + 10.0);
    approx(&report["weights"]["w1"], 1.0);
    approx(&report["weights"]["w3"], 1.0);
}

#[test]
fn score_text_output_is_one_line() {
    let dir = TempDir::new().expect("tempdir");
    let file = triangle(dir.path());

    grs_cmd(dir.path())
        .arg("score")
        .arg(&file)
        .args(["--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("score=3.52"))
        .stdout(predicate::str::contains("source=ollivier-ricci"));
}

#[test]
fn score_token_labels_with_whitespace() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_file(dir.path(), "names.txt", "alice bob\nbob carol\n# note\ncarol alice\n");

    let report = json_stdout(
        grs_cmd(dir.path())
            .arg("score")
            .arg(&file)
            .args(["--tokens", "--whitespace", "--json"]),
    );
    assert_eq!(report["graph"]["nodes"], 3);
    approx(&report["curvature"], 0.75);
}

#[test]
fn config_file_sets_defaults() {
    let dir = TempDir::new().expect("tempdir");
    let file = triangle(dir.path());
    write_file(
        dir.path(),
        "grs.toml",
        "[score]\ncurvature = \"proxy\"\nweights = { w1 = 0.0, w2 = 0.0 }\n",
    );

    let report = json_stdout(grs_cmd(dir.path()).arg("score").arg(&file).arg("--json"));
    assert_eq!(report["curvature_source"], "clustering_proxy");
    approx(&report["score"], 1.0);
}

#[test]
fn malformed_edge_list_reports_code() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_file(dir.path(), "bad.csv", "1,2\n3\n");

    let error = json_stderr_error(grs_cmd(dir.path()).arg("score").arg(&file).arg("--json"));
    assert_eq!(error["error_code"], "E1002");
    assert!(
        error["message"]
            .as_str()
            .expect("message")
            .contains("line 2")
    );
    assert!(error["suggestion"].is_string());
}

#[test]
fn missing_file_reports_code_in_text_mode() {
    let dir = TempDir::new().expect("tempdir");

    grs_cmd(dir.path())
        .args(["score", "nope.csv", "--format", "text"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

#[test]
fn attack_reports_before_and_after() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_file(
        dir.path(),
        "cycle.csv",
        "0,1\n1,2\n2,3\n3,4\n4,5\n5,6\n6,7\n7,8\n8,9\n9,0\n",
    );
    let out = dir.path().join("attacked.csv");

    let report = json_stdout(
        grs_cmd(dir.path())
            .arg("attack")
            .arg(&file)
            .args(["--fraction", "0.2", "--seed", "11", "--json", "-o"])
            .arg(&out),
    );
    assert_eq!(report["strategy"], "random");
    assert_eq!(report["seed"], 11);
    assert_eq!(report["requested"], 2);
    assert_eq!(report["removed"], 2);
    assert_eq!(report["graph_before"]["edges"], 10);
    assert_eq!(report["graph_after"]["edges"], 8);
    assert_eq!(report["removed_edges"].as_array().expect("edges").len(), 2);
    assert!(report["before"]["score"].is_number());

    let written = fs::read_to_string(&out).expect("attacked file");
    assert_eq!(written.lines().count(), 1 + 8);
    assert!(written.starts_with("source,target\n"));
}

#[test]
fn hub_attack_removes_hub_edges() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_file(dir.path(), "star.csv", "0,1\n0,2\n0,3\n0,4\n");

    let report = json_stdout(grs_cmd(dir.path()).arg("attack").arg(&file).args([
        "--strategy",
        "hub",
        "--fraction",
        "0.5",
        "--json",
    ]));
    assert_eq!(report["strategy"], "hub-targeted");
    assert!(report["seed"].is_null());
    assert_eq!(report["removed_edges"], serde_json::json!([[0, 1], [0, 2]]));
}

#[test]
fn attack_rejects_out_of_range_fraction() {
    let dir = TempDir::new().expect("tempdir");
    let file = triangle(dir.path());

    let error = json_stderr_error(
        grs_cmd(dir.path())
            .arg("attack")
            .arg(&file)
            .args(["--fraction", "1.5", "--json"]),
    );
    assert_eq!(error["error_code"], "E2002");
}

#[test]
fn sweep_produces_one_point_per_step() {
    let dir = TempDir::new().expect("tempdir");
    let file = write_file(dir.path(), "k4.csv", "0,1\n0,2\n0,3\n1,2\n1,3\n2,3\n");

    let report = json_stdout(grs_cmd(dir.path()).arg("sweep").arg(&file).args([
        "--steps",
        "4",
        "--trials",
        "2",
        "--max-fraction",
        "1",
        "--seed",
        "3",
        "--json",
    ]));
    let points = report["points"].as_array().expect("points");
    assert_eq!(points.len(), 4);
    approx(&points[3]["fraction"], 1.0);
    approx(&points[3]["mean_score"], 0.0);
    assert_eq!(points[0]["trials"], 2);
    assert!(report["baseline"]["score"].as_f64().expect("baseline") > 0.0);
}

#[test]
fn sample_writes_edge_list_to_stdout() {
    let dir = TempDir::new().expect("tempdir");

    grs_cmd(dir.path())
        .args(["sample", "cycle", "-n", "4", "--format", "text"])
        .assert()
        .success()
        .stdout("source,target\n0,1\n1,2\n2,3\n3,0\n");
}

#[test]
fn sample_output_round_trips_through_score() {
    let dir = TempDir::new().expect("tempdir");
    let out = dir.path().join("ba.csv");

    let summary = json_stdout(
        grs_cmd(dir.path())
            .args(["sample", "barabasi-albert", "-n", "40", "--m", "2", "--seed", "5", "--json", "-o"])
            .arg(&out),
    );
    assert_eq!(summary["kind"], "barabasi-albert");
    assert_eq!(summary["seed"], 5);
    assert!(summary["edges"].is_null());

    let report = json_stdout(grs_cmd(dir.path()).arg("score").arg(&out).arg("--json"));
    assert_eq!(report["graph"]["nodes"], 40);
    assert_eq!(report["graph"]["content_hash"], summary["graph"]["content_hash"]);
}

#[test]
fn sample_rejects_bad_generator_parameters() {
    let dir = TempDir::new().expect("tempdir");

    let error = json_stderr_error(grs_cmd(dir.path()).args([
        "sample",
        "barabasi-albert",
        "-n",
        "3",
        "--m",
        "5",
        "--json",
    ]));
    assert_eq!(error["error_code"], "E2001");
}

#[test]
fn caps_lists_both_providers() {
    let dir = TempDir::new().expect("tempdir");

    let report = json_stdout(grs_cmd(dir.path()).args(["caps", "--json"]));
    let caps = report["capabilities"].as_array().expect("capabilities");
    assert_eq!(caps.len(), 2);
    assert_eq!(caps[0]["name"], "ollivier_ricci");
    assert_eq!(caps[0]["available"], true);
    assert_eq!(caps[1]["name"], "clustering_proxy");
    assert!(report["exact_edge_limit"].is_null());
}

#[test]
fn unknown_config_key_is_a_config_error() {
    let dir = TempDir::new().expect("tempdir");
    write_file(dir.path(), "grs.toml", "[scoring]\npreset = \"weighted\"\n");

    let error = json_stderr_error(grs_cmd(dir.path()).args(["caps", "--json"]));
    assert_eq!(error["error_code"], "E1003");
}
