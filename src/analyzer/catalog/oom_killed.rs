//! OOMKilled: the container exceeded its memory limit.

use super::crash_loop::SIGKILL_EXIT_CODE;
use crate::analyzer::facts::{FactSnapshot, ResourceKind};
use crate::analyzer::signals::{Predicate, Signal, SignalPattern, SignalSource};
use crate::analyzer::types::{FailureMode, ModeId};

pub(crate) const OOM_REASON: &str = "OOMKilled";

pub(crate) const OOM_TERMINATED: Predicate =
    Predicate::new("container_oom_terminated", oom_terminated);

pub fn mode() -> FailureMode {
    FailureMode {
        id: ModeId::OomKilled,
        name: "OOMKilled",
        meaning: "The container exceeded its memory limit and was terminated by Kubernetes. This is a resource constraint issue, not an application crash.",
        common_causes: vec![
            "Memory limit set too low for the workload",
            "Memory leak in the application code",
            "Unexpected traffic spike causing increased memory usage",
            "Large dataset loaded into memory without streaming",
            "Inefficient memory usage patterns",
        ],
        signals: vec![
            Signal::required(
                SignalSource::Status,
                SignalPattern::Predicate(OOM_TERMINATED),
                "Container terminated with OOMKilled or exit code 137",
            ),
            Signal::optional(
                SignalSource::Event,
                SignalPattern::Contains(OOM_REASON),
                "Event mentions OOMKilled",
            ),
        ],
        next_checks: vec![
            "Compare memory limit vs memory request",
            "Monitor actual memory usage over time",
            "Investigate application code for memory leaks",
            "Consider increasing memory limit if workload legitimately needs more",
            "Review if traffic spikes correlate with OOMKills",
        ],
        runbook_tags: vec!["memory", "resources"],
        applies_to: ResourceKind::Pod,
    }
}

/// Exit code 137 is a SIGKILL; usually the OOM killer, even without the reason.
fn oom_terminated(facts: &FactSnapshot) -> bool {
    facts.as_pod().is_some_and(|pod| {
        pod.containers.iter().any(|container| {
            container.last_termination_reason() == Some(OOM_REASON)
                || container.last_exit_code() == Some(SIGKILL_EXIT_CODE)
        })
    })
}
