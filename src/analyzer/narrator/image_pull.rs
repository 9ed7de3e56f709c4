//! ImagePullBackOff narrative.

use super::evidence::{CauseRule, event_lines, events_containing, focus_container, refine_cause};
use super::{NarratorConfig, next_checks, pod_impact};
use crate::analyzer::catalog::{PULL_FAILURE_MESSAGES, PULL_WAITING_REASONS};
use crate::analyzer::facts::PodFacts;
use crate::analyzer::types::{Explanation, FailureMode};

const BACK_OFF_PULLING: &str = "Back-off pulling image";

/// Checked against waiting messages and every event message, in order.
const CAUSE_RULES: &[CauseRule] = &[
    CauseRule::new(
        &["unauthorized", "authentication", "pull access denied"],
        "Private registry credentials are missing or incorrect",
    ),
    CauseRule::new(
        &["not found", "manifest unknown"],
        "Image name or tag does not exist",
    ),
    CauseRule::new(
        &["timeout", "connection refused"],
        "Registry is unreachable due to network issues",
    ),
    CauseRule::new(&["toomanyrequests"], "Rate limit hit on public registry"),
];

pub(super) fn explain(mode: &FailureMode, pod: &PodFacts, config: &NarratorConfig) -> Explanation {
    let container = focus_container(pod, |c| {
        c.waiting_reason()
            .is_some_and(|reason| PULL_WAITING_REASONS.contains(&reason))
    });
    let image = container
        .and_then(|c| c.image.as_deref())
        .unwrap_or("unknown");

    let mut evidence = Vec::new();
    let mut cause_text = Vec::new();

    if let Some(container) = container {
        if let Some(reason) = container.waiting_reason() {
            evidence.push(format!("Container {} is waiting: {}", container.name, reason));
        }
        evidence.push(format!("Image: {}", image));
        if let Some(message) = container.waiting_message() {
            evidence.push(format!("Status message: {}", message));
            cause_text.push(message);
        }
    }

    let needles: Vec<&str> = PULL_FAILURE_MESSAGES
        .iter()
        .copied()
        .chain([BACK_OFF_PULLING])
        .collect();
    // Registry errors also show up in events without a pull prefix.
    cause_text.extend(pod.events.iter().map(|event| event.message.as_str()));

    let pull_events = events_containing(&pod.events, &needles);
    evidence.extend(event_lines(&pull_events, config.max_event_evidence));

    Explanation {
        summary: format!(
            "Pod {} in namespace {} cannot pull image {}.",
            pod.meta.name_or_unknown(),
            pod.meta.namespace_or_unknown(),
            image
        ),
        meaning: mode.meaning.to_string(),
        likely_cause: refine_cause(&cause_text.join("\n"), CAUSE_RULES, mode.default_cause()),
        evidence,
        impact: pod_impact(
            "This pod cannot start until the image is pulled, so it is not serving traffic.",
            &pod.meta,
        ),
        next_checks: next_checks(mode),
    }
}
