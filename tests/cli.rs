//! Command-line behavior, driven from snapshot fixtures so no cluster is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// A config file with colors off, so output can be matched literally.
fn plain_config() -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(file, "[output]\ncolor = false").unwrap();
    file
}

fn kube_why(config: &NamedTempFile) -> Command {
    let mut cmd = Command::cargo_bin("kube-why").unwrap();
    cmd.arg("--config").arg(config.path());
    cmd
}

#[test]
fn test_explain_crash_loop_as_json() {
    let config = plain_config();
    let output = kube_why(&config)
        .args(["explain", "pod", "payment-service-x829s", "--format", "json", "--facts"])
        .arg(fixture("crashloop-pod.yaml"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["status"], "failure_detected");
    assert_eq!(report["resource"], "pod/production/payment-service-x829s");
    assert_eq!(report["matches"][0]["mode"]["id"], "crash-loop-back-off");
    assert_eq!(
        report["explanation"]["likely_cause"],
        "Missing or incorrect environment variable"
    );
}

#[test]
fn test_explain_service_summary() {
    let config = plain_config();
    kube_why(&config)
        .args(["explain", "svc", "dead-svc", "--format", "summary", "--facts"])
        .arg(fixture("service-no-endpoints.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("service-no-endpoints"))
        .stdout(predicate::str::contains(
            "Service selector doesn't match any pod labels",
        ));
}

#[test]
fn test_explain_table_lists_next_checks() {
    let config = plain_config();
    kube_why(&config)
        .args(["explain", "pod", "oom-app", "--facts"])
        .arg(fixture("oom-pod.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("OOMKilled"))
        .stdout(predicate::str::contains("Next checks:"))
        .stdout(predicate::str::contains("1. Compare memory limit vs memory request"));
}

#[test]
fn test_all_includes_lower_ranked_matches() {
    let config = plain_config();
    let mut snapshot = NamedTempFile::with_suffix(".yaml").unwrap();
    write!(
        snapshot,
        "kind: pod\nmeta:\n  name: hog\n  namespace: default\ncontainers:\n  - name: hog\n    restart_count: 6\n    waiting:\n      reason: CrashLoopBackOff\n    last_terminated:\n      exit_code: 137\n      reason: OOMKilled\n"
    )
    .unwrap();

    let output = kube_why(&config)
        .args(["explain", "pod", "hog", "--all", "--format", "json", "--facts"])
        .arg(snapshot.path())
        .output()
        .unwrap();

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = report["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["mode"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["oom-killed", "crash-loop-back-off"]);
}

#[test]
fn test_fail_on_match_sets_exit_code() {
    let config = plain_config();
    kube_why(&config)
        .args(["explain", "pod", "image-fail", "--fail-on-match", "--facts"])
        .arg(fixture("imagepull-pod.yaml"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Image name or tag does not exist"));

    kube_why(&config)
        .args(["explain", "pod", "web-5c7f9", "--fail-on-match", "--facts"])
        .arg(fixture("healthy-pod.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No known failure mode matched"));
}

#[test]
fn test_snapshot_kind_mismatch_is_an_error() {
    let config = plain_config();
    kube_why(&config)
        .args(["explain", "pod", "dead-svc", "--facts"])
        .arg(fixture("service-no-endpoints.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_missing_snapshot_is_an_error() {
    let config = plain_config();
    kube_why(&config)
        .args(["explain", "pod", "ghost", "--facts", "/nonexistent/ghost.yaml"])
        .assert()
        .failure();
}

#[test]
fn test_unknown_resource_type_is_rejected() {
    Command::cargo_bin("kube-why")
        .unwrap()
        .args(["explain", "deployment", "web"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported resource type"));
}

#[test]
fn test_modes_lists_catalog() {
    let config = plain_config();
    kube_why(&config)
        .arg("modes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Known failure modes (4)"))
        .stdout(predicate::str::contains("[image-pull-back-off]"));
}

#[test]
fn test_ignored_modes_come_from_config() {
    let mut config = NamedTempFile::with_suffix(".toml").unwrap();
    writeln!(
        config,
        "[output]\ncolor = false\n\n[matching]\nignore_modes = [\"crash-loop-back-off\"]"
    )
    .unwrap();

    kube_why(&config)
        .args(["explain", "pod", "payment-service-x829s", "--format", "json", "--facts"])
        .arg(fixture("crashloop-pod.yaml"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"status\": \"healthy\""));
}
