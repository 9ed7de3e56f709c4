//! CrashLoopBackOff: the container starts and exits over and over.

use crate::analyzer::facts::{FactSnapshot, ResourceKind};
use crate::analyzer::signals::{Predicate, Signal, SignalPattern, SignalSource};
use crate::analyzer::types::{FailureMode, ModeId};

/// Restart count above which a non-OOM exit counts as crash looping.
pub(crate) const RESTART_THRESHOLD: u32 = 3;

/// Exit code of a SIGKILL, left to the OOM mode.
pub(crate) const SIGKILL_EXIT_CODE: i32 = 137;

pub(crate) const CRASHING: Predicate = Predicate::new("container_crash_looping", crashing);

pub fn mode() -> FailureMode {
    FailureMode {
        id: ModeId::CrashLoopBackOff,
        name: "CrashLoopBackOff",
        meaning: "The application starts but exits immediately or repeatedly. Kubernetes keeps restarting it, but the same failure repeats.",
        common_causes: vec![
            "Missing or incorrect environment variable",
            "Configuration file not mounted or invalid",
            "Dependency service unreachable (database, API)",
            "Application code bug (panic, unhandled exception)",
            "Insufficient file permissions",
        ],
        signals: vec![
            Signal::required(
                SignalSource::Status,
                SignalPattern::Predicate(CRASHING),
                "Container status is CrashLoopBackOff or restart count is high",
            ),
            Signal::optional(
                SignalSource::Event,
                SignalPattern::Contains("Back-off restarting failed container"),
                "Event log contains back-off warning",
            ),
        ],
        next_checks: vec![
            "Read the last 50 lines of logs",
            "Check if required ConfigMaps/Secrets are present",
            "Verify environment variables match application requirements",
            "Test if downstream dependencies are reachable",
        ],
        runbook_tags: vec!["crashloop", "application"],
        applies_to: ResourceKind::Pod,
    }
}

/// A container is back-off waiting, or keeps restarting after non-SIGKILL exits.
fn crashing(facts: &FactSnapshot) -> bool {
    let Some(pod) = facts.as_pod() else {
        return false;
    };

    pod.containers.iter().any(|container| {
        let back_off = container.waiting_reason() == Some("CrashLoopBackOff");
        let restarting = container.restart_count > RESTART_THRESHOLD
            && container
                .last_exit_code()
                .is_some_and(|code| code != SIGKILL_EXIT_CODE);
        back_off || restarting
    })
}
