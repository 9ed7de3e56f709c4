//! CrashLoopBackOff narrative.

use super::evidence::{CauseRule, events_containing, last_error_line, refine_cause};
use super::{NarratorConfig, next_checks, pod_impact};
use crate::analyzer::facts::{ContainerFacts, PodFacts};
use crate::analyzer::types::{Explanation, FailureMode};

const BACK_OFF_EVENT: &str = "Back-off restarting";

/// Checked against all container logs, in order.
const CAUSE_RULES: &[CauseRule] = &[
    CauseRule::new(
        &["environment", "env"],
        "Missing or incorrect environment variable",
    ),
    CauseRule::new(
        &["config", "configuration"],
        "Configuration file not mounted or invalid",
    ),
    CauseRule::new(
        &["connect", "connection"],
        "Dependency service unreachable (database, API)",
    ),
    CauseRule::new(
        &["panic", "exception"],
        "Application code bug (panic, unhandled exception)",
    ),
];

pub(super) fn explain(mode: &FailureMode, pod: &PodFacts, config: &NarratorConfig) -> Explanation {
    let container = crashing_container(pod);
    let restarts = container.map(|c| c.restart_count).unwrap_or(0);

    let mut evidence = Vec::new();

    match container {
        Some(container) => {
            evidence.push(format!(
                "Container {} has restarted {} times",
                container.name, container.restart_count
            ));

            if let Some(reason) = container.waiting_reason() {
                evidence.push(format!("Current state: {}", reason));
            }

            if let Some(terminated) = &container.last_terminated {
                match &terminated.reason {
                    Some(reason) => evidence.push(format!(
                        "Last exit code: {} ({})",
                        terminated.exit_code, reason
                    )),
                    None => evidence.push(format!("Last exit code: {}", terminated.exit_code)),
                }
            }

            if let Some(line) =
                last_error_line(pod.logs_for(&container.name), config.log_excerpt_chars)
            {
                evidence.push(format!("Recent log shows: \"{}\"", line));
            }
        }
        None => evidence.push("No container statuses were reported".to_string()),
    }

    let back_offs = events_containing(&pod.events, &[BACK_OFF_EVENT]);
    if !back_offs.is_empty() {
        evidence.push(format!(
            "{} back-off restart events in recent history",
            back_offs.len()
        ));
    }

    Explanation {
        summary: format!(
            "Pod {} in namespace {} is in CrashLoopBackOff with {} restarts.",
            pod.meta.name_or_unknown(),
            pod.meta.namespace_or_unknown(),
            restarts
        ),
        meaning: mode.meaning.to_string(),
        likely_cause: refine_cause(&pod.all_logs(), CAUSE_RULES, mode.default_cause()),
        evidence,
        impact: pod_impact("This pod cannot serve traffic.", &pod.meta),
        next_checks: next_checks(mode),
    }
}

/// The back-off container, else the one restarting most.
fn crashing_container(pod: &PodFacts) -> Option<&ContainerFacts> {
    pod.containers
        .iter()
        .find(|c| c.waiting_reason() == Some("CrashLoopBackOff"))
        .or_else(|| pod.containers.iter().max_by_key(|c| c.restart_count))
}
