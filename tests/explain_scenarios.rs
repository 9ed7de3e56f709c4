//! End-to-end explanation scenarios replayed from snapshot fixtures.

use kube_why::analyzer::{
    FactSnapshot, ModeId, Narrator, PodFacts, ReportStatus, ResourceKind, ResourceMeta,
    builtin_catalog, match_modes,
};
use kube_why::gather::load_snapshot;
use kube_why::handlers::build_report;
use std::path::PathBuf;

fn fixture(name: &str) -> FactSnapshot {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    load_snapshot(&path).unwrap_or_else(|e| panic!("failed to load {}: {}", name, e))
}

#[test]
fn test_crash_loop_with_missing_environment_variable() {
    let facts = fixture("crashloop-pod.yaml");
    let matches = match_modes(&facts, builtin_catalog().modes());

    assert_eq!(matches.len(), 1);
    let top = &matches[0];
    assert_eq!(top.mode.id, ModeId::CrashLoopBackOff);
    assert_eq!(top.confidence, 1.0);
    assert_eq!(top.matched_signals.len(), 2);

    let explanation = Narrator::default().explain(top.mode, &facts);
    assert_eq!(
        explanation.summary,
        "Pod payment-service-x829s in namespace production is in CrashLoopBackOff with 14 restarts."
    );
    assert_eq!(
        explanation.likely_cause,
        "Missing or incorrect environment variable"
    );
    assert!(
        explanation
            .evidence
            .iter()
            .any(|line| line == "Container payment-service has restarted 14 times")
    );
    assert!(
        explanation
            .evidence
            .iter()
            .any(|line| line == "Last exit code: 1 (Error)")
    );
    assert!(
        explanation
            .evidence
            .iter()
            .any(|line| line.contains("DB_CONNECTION_STRING"))
    );
    assert!(explanation.impact.contains("other pods may still be handling requests"));
    assert_eq!(explanation.next_checks[0], "Read the last 50 lines of logs");
}

#[test]
fn test_image_pull_with_unknown_manifest() {
    let facts = fixture("imagepull-pod.yaml");
    let matches = match_modes(&facts, builtin_catalog().modes());

    assert_eq!(matches[0].mode.id, ModeId::ImagePullBackOff);

    let explanation = Narrator::default().explain(matches[0].mode, &facts);
    assert_eq!(explanation.likely_cause, "Image name or tag does not exist");
    assert!(explanation.summary.contains("my-app:bad-tag"));
    assert!(explanation.evidence.iter().any(|line| line == "Image: my-app:bad-tag"));
    assert!(explanation.impact.contains("standalone pod"));
}

#[test]
fn test_oom_killed_below_leak_threshold() {
    let facts = fixture("oom-pod.yaml");
    let matches = match_modes(&facts, builtin_catalog().modes());

    let ids: Vec<_> = matches.iter().map(|m| m.mode.id).collect();
    assert_eq!(ids, vec![ModeId::OomKilled]);
    assert_eq!(
        matches[0].matched_signals,
        vec![
            "Container terminated with OOMKilled or exit code 137",
            "Event mentions OOMKilled"
        ]
    );

    let explanation = Narrator::default().explain(matches[0].mode, &facts);
    assert_eq!(
        explanation.likely_cause,
        "Memory limit set too low for the workload"
    );
    assert!(explanation.evidence.iter().any(|line| line == "Memory limit: 256Mi"));
    assert!(explanation.summary.contains("memory-hog"));
}

#[test]
fn test_service_without_endpoints() {
    let facts = fixture("service-no-endpoints.yaml");
    let modes = builtin_catalog().modes_for(ResourceKind::Service);
    let matches = match_modes(&facts, &modes);

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].mode.id, ModeId::ServiceNoEndpoints);

    let explanation = Narrator::default().explain(matches[0].mode, &facts);
    assert!(explanation.evidence.iter().any(|line| line == "Selector: app=api"));
    assert!(explanation.evidence.iter().any(|line| line == "Endpoints: 0 found"));
    assert_eq!(
        explanation.likely_cause,
        "Service selector doesn't match any pod labels"
    );
    assert_eq!(
        explanation.summary,
        "Service dead-svc in namespace prod has no ready endpoints."
    );
}

#[test]
fn test_healthy_pod_matches_nothing() {
    let facts = fixture("healthy-pod.json");
    assert!(match_modes(&facts, builtin_catalog().modes()).is_empty());

    let modes = builtin_catalog().modes_for(ResourceKind::Pod);
    let report = build_report(&facts, &modes, &Narrator::default(), false);
    assert_eq!(report.status, ReportStatus::Healthy);
    assert!(report.explanation.is_none());
}

#[test]
fn test_service_modes_never_match_pods() {
    let modes = builtin_catalog().modes_for(ResourceKind::Service);
    for name in ["crashloop-pod.yaml", "imagepull-pod.yaml", "oom-pod.yaml"] {
        let facts = fixture(name);
        assert!(match_modes(&facts, &modes).is_empty(), "{} matched a service mode", name);
    }

    let empty: FactSnapshot = PodFacts::new(ResourceMeta::new("bare", "default")).into();
    assert!(match_modes(&empty, &modes).is_empty());
}

#[test]
fn test_explanations_are_repeatable() {
    let narrator = Narrator::default();
    for name in [
        "crashloop-pod.yaml",
        "imagepull-pod.yaml",
        "oom-pod.yaml",
        "service-no-endpoints.yaml",
    ] {
        let facts = fixture(name);
        let first = match_modes(&facts, builtin_catalog().modes());
        let second = match_modes(&facts, builtin_catalog().modes());

        let first_ids: Vec<_> = first.iter().map(|m| m.mode.id).collect();
        let second_ids: Vec<_> = second.iter().map(|m| m.mode.id).collect();
        assert_eq!(first_ids, second_ids);

        assert_eq!(
            narrator.explain(first[0].mode, &facts),
            narrator.explain(second[0].mode, &facts)
        );
    }
}
