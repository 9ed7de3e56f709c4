//! Narration: turning a matched failure mode into an explanation.
//!
//! Each built-in mode has its own routine that pulls concrete evidence out of
//! the snapshot (restart counts, exit codes, events, the latest error log
//! line), refines the likely cause with keyword rules, and assesses impact.
//! Dispatch is an exhaustive match on [`ModeId`] and the snapshot variant;
//! custom modes, or a mode paired with the wrong kind of snapshot, get a
//! generic explanation instead.
//!
//! Narration only reads the facts it is given and never fails: missing data
//! shows up as `"unknown"` in the text.

mod crash_loop;
pub mod evidence;
mod image_pull;
mod oom_killed;
mod service_no_endpoints;

use crate::analyzer::facts::{FactSnapshot, PodFacts, ResourceMeta, ServiceFacts};
use crate::analyzer::types::{Explanation, FailureMode, ModeId};
use serde::{Deserialize, Serialize};

/// Limits and thresholds used while narrating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarratorConfig {
    /// Maximum number of event messages quoted as evidence (default: 5)
    pub max_event_evidence: usize,

    /// Maximum number of not-ready endpoint addresses listed as evidence (default: 5)
    pub max_address_evidence: usize,

    /// Maximum characters of a quoted log line (default: 100)
    pub log_excerpt_chars: usize,

    /// Restart count above which OOM kills point at a memory leak (default: 5)
    pub oom_leak_restart_threshold: u32,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            max_event_evidence: 5,
            max_address_evidence: 5,
            log_excerpt_chars: 100,
            oom_leak_restart_threshold: 5,
        }
    }
}

/// Builds explanations for matched failure modes.
#[derive(Debug, Clone, Default)]
pub struct Narrator {
    config: NarratorConfig,
}

impl Narrator {
    pub fn new(config: NarratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NarratorConfig {
        &self.config
    }

    /// Explain `mode` for the snapshot it matched.
    pub fn explain(&self, mode: &FailureMode, facts: &FactSnapshot) -> Explanation {
        match (mode.id, facts) {
            (ModeId::CrashLoopBackOff, FactSnapshot::Pod(pod)) => {
                self.explain_crash_loop(mode, pod)
            }
            (ModeId::ImagePullBackOff, FactSnapshot::Pod(pod)) => {
                self.explain_image_pull(mode, pod)
            }
            (ModeId::OomKilled, FactSnapshot::Pod(pod)) => self.explain_oom_killed(mode, pod),
            (ModeId::ServiceNoEndpoints, FactSnapshot::Service(service)) => {
                self.explain_service_no_endpoints(mode, service)
            }
            (
                ModeId::CrashLoopBackOff | ModeId::ImagePullBackOff | ModeId::OomKilled,
                FactSnapshot::Service(_),
            )
            | (ModeId::ServiceNoEndpoints, FactSnapshot::Pod(_))
            | (ModeId::Custom(_), _) => self.explain_generic(mode, facts),
        }
    }

    pub fn explain_crash_loop(&self, mode: &FailureMode, pod: &PodFacts) -> Explanation {
        crash_loop::explain(mode, pod, &self.config)
    }

    pub fn explain_image_pull(&self, mode: &FailureMode, pod: &PodFacts) -> Explanation {
        image_pull::explain(mode, pod, &self.config)
    }

    pub fn explain_oom_killed(&self, mode: &FailureMode, pod: &PodFacts) -> Explanation {
        oom_killed::explain(mode, pod, &self.config)
    }

    pub fn explain_service_no_endpoints(
        &self,
        mode: &FailureMode,
        service: &ServiceFacts,
    ) -> Explanation {
        service_no_endpoints::explain(mode, service, &self.config)
    }

    /// Fallback for modes without a dedicated narrative.
    pub fn explain_generic(&self, mode: &FailureMode, facts: &FactSnapshot) -> Explanation {
        let evidence = mode
            .signals
            .iter()
            .filter(|signal| signal.evaluate(facts))
            .map(|signal| format!("Signal: {}", signal.description))
            .collect();

        Explanation {
            summary: format!(
                "Detected {} on {}, but no detailed explanation is available for it yet.",
                mode.name,
                facts.identifier()
            ),
            meaning: mode.meaning.to_string(),
            likely_cause: mode.default_cause().to_string(),
            evidence,
            impact: "Impact has not been assessed for this failure mode.".to_string(),
            next_checks: next_checks(mode),
        }
    }
}

/// Impact of a pod-level failure, depending on whether other replicas exist.
fn pod_impact(base: &str, meta: &ResourceMeta) -> String {
    if meta.has_replicating_owner() {
        format!(
            "{} If this is part of a Deployment or StatefulSet with multiple replicas, other pods may still be handling requests.",
            base
        )
    } else {
        format!(
            "{} This appears to be a standalone pod, so the service it backs is likely down.",
            base
        )
    }
}

fn next_checks(mode: &FailureMode) -> Vec<String> {
    mode.next_checks.iter().map(|check| check.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::catalog::builtin_catalog;
    use crate::analyzer::facts::{ResourceKind, ServiceFacts};
    use crate::analyzer::signals::{Predicate, Signal, SignalPattern, SignalSource};

    #[test]
    fn test_default_config() {
        let config = NarratorConfig::default();
        assert_eq!(config.max_event_evidence, 5);
        assert_eq!(config.max_address_evidence, 5);
        assert_eq!(config.log_excerpt_chars, 100);
        assert_eq!(config.oom_leak_restart_threshold, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: NarratorConfig = toml::from_str("max_event_evidence = 2").unwrap();
        assert_eq!(config.max_event_evidence, 2);
        assert_eq!(config.log_excerpt_chars, 100);
    }

    #[test]
    fn test_custom_mode_gets_generic_explanation() {
        fn always(_: &FactSnapshot) -> bool {
            true
        }
        let mode = FailureMode {
            id: ModeId::Custom("node-pressure"),
            name: "NodePressure",
            meaning: "The node is under resource pressure.",
            common_causes: vec!["Too many pods scheduled on the node"],
            signals: vec![Signal::required(
                SignalSource::Status,
                SignalPattern::Predicate(Predicate::new("always", always)),
                "Node reports pressure",
            )],
            next_checks: vec!["Describe the node"],
            runbook_tags: vec![],
            applies_to: ResourceKind::Pod,
        };
        let facts: FactSnapshot = PodFacts::new(ResourceMeta::new("web", "shop")).into();

        let explanation = Narrator::default().explain(&mode, &facts);
        assert!(explanation.summary.contains("NodePressure"));
        assert!(explanation.summary.contains("pod/shop/web"));
        assert_eq!(explanation.likely_cause, "Too many pods scheduled on the node");
        assert_eq!(explanation.evidence, vec!["Signal: Node reports pressure"]);
        assert_eq!(explanation.next_checks, vec!["Describe the node"]);
    }

    #[test]
    fn test_mismatched_snapshot_falls_back() {
        let mode = builtin_catalog().get(ModeId::CrashLoopBackOff).unwrap();
        let facts: FactSnapshot = ServiceFacts::new(ResourceMeta::new("api", "prod")).into();

        let explanation = Narrator::default().explain(mode, &facts);
        assert!(explanation.summary.starts_with("Detected CrashLoopBackOff"));
        assert!(explanation.evidence.is_empty());
    }

    #[test]
    fn test_pod_impact_depends_on_owner() {
        let standalone = ResourceMeta::new("p", "ns");
        assert!(pod_impact("Down.", &standalone).contains("standalone pod"));

        let replicated = ResourceMeta::new("p", "ns").with_owner("ReplicaSet", "web-abc");
        assert!(pod_impact("Down.", &replicated).contains("other pods may still be handling"));
    }
}
