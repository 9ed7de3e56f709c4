//! OOMKilled narrative.

use super::evidence::{event_lines, events_containing, focus_container};
use super::{NarratorConfig, next_checks, pod_impact};
use crate::analyzer::catalog::{OOM_REASON, SIGKILL_EXIT_CODE};
use crate::analyzer::facts::PodFacts;
use crate::analyzer::types::{Explanation, FailureMode};

const LEAK_CAUSE: &str = "Memory leak in the application code";

pub(super) fn explain(mode: &FailureMode, pod: &PodFacts, config: &NarratorConfig) -> Explanation {
    let container = focus_container(pod, |c| {
        c.last_termination_reason() == Some(OOM_REASON)
            || c.last_exit_code() == Some(SIGKILL_EXIT_CODE)
    });
    // Any container restarting past the threshold counts, not only the killed one.
    let restarts = pod.containers.iter().map(|c| c.restart_count).max().unwrap_or(0);

    let mut evidence = Vec::new();

    if let Some(container) = container {
        if let Some(terminated) = &container.last_terminated {
            evidence.push(format!(
                "Container {} was terminated: {} (exit code {})",
                container.name,
                terminated.reason.as_deref().unwrap_or("unknown reason"),
                terminated.exit_code
            ));
        }
        evidence.push(format!(
            "Container has restarted {} times",
            container.restart_count
        ));
        if let Some(limit) = &container.memory_limit {
            evidence.push(format!("Memory limit: {}", limit));
        }
        if let Some(request) = &container.memory_request {
            evidence.push(format!("Memory request: {}", request));
        }
    }

    let oom_events = events_containing(&pod.events, &[OOM_REASON]);
    evidence.extend(event_lines(&oom_events, config.max_event_evidence));

    let likely_cause = if restarts > config.oom_leak_restart_threshold {
        format!("{} (OOM-killed and restarted {} times)", LEAK_CAUSE, restarts)
    } else {
        mode.default_cause().to_string()
    };

    Explanation {
        summary: format!(
            "Pod {} in namespace {} was OOMKilled: container {} exceeded its memory limit.",
            pod.meta.name_or_unknown(),
            pod.meta.namespace_or_unknown(),
            container.map(|c| c.name.as_str()).unwrap_or("unknown")
        ),
        meaning: mode.meaning.to_string(),
        likely_cause,
        evidence,
        impact: pod_impact(
            "Each OOM kill restarts the container and drops in-flight requests.",
            &pod.meta,
        ),
        next_checks: next_checks(mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::catalog::builtin_catalog;
    use crate::analyzer::facts::{ContainerFacts, EventFacts, ResourceMeta, TerminatedState};
    use crate::analyzer::types::ModeId;

    fn oom_pod(restarts: u32) -> PodFacts {
        let mut pod = PodFacts::new(
            ResourceMeta::new("worker-0", "batch").with_owner("StatefulSet", "worker"),
        );
        let mut c = ContainerFacts::new("worker");
        c.restart_count = restarts;
        c.last_terminated = Some(TerminatedState::new(137, Some("OOMKilled")));
        c.memory_limit = Some("256Mi".into());
        c.memory_request = Some("128Mi".into());
        pod.containers.push(c);
        pod.events.push(EventFacts::message(
            "Container worker was OOMKilled, restarting",
        ));
        pod
    }

    fn explain_restarts(restarts: u32) -> Explanation {
        let mode = builtin_catalog().get(ModeId::OomKilled).unwrap();
        explain(mode, &oom_pod(restarts), &NarratorConfig::default())
    }

    #[test]
    fn test_evidence_lines() {
        let explanation = explain_restarts(2);
        assert_eq!(
            explanation.evidence,
            vec![
                "Container worker was terminated: OOMKilled (exit code 137)",
                "Container has restarted 2 times",
                "Memory limit: 256Mi",
                "Memory request: 128Mi",
                "Event: Container worker was OOMKilled, restarting",
            ]
        );
        assert_eq!(
            explanation.summary,
            "Pod worker-0 in namespace batch was OOMKilled: container worker exceeded its memory limit."
        );
    }

    #[test]
    fn test_leak_threshold_is_strict() {
        assert_eq!(
            explain_restarts(5).likely_cause,
            "Memory limit set too low for the workload"
        );
        assert!(explain_restarts(6).likely_cause.starts_with(LEAK_CAUSE));
    }

    #[test]
    fn test_leak_counts_restarts_of_any_container() {
        let mut pod = oom_pod(2);
        let mut api = ContainerFacts::new("api");
        api.restart_count = 10;
        api.last_terminated = Some(TerminatedState::new(1, Some("Error")));
        pod.containers.push(api);

        let mode = builtin_catalog().get(ModeId::OomKilled).unwrap();
        let explanation = explain(mode, &pod, &NarratorConfig::default());
        assert_eq!(
            explanation.likely_cause,
            "Memory leak in the application code (OOM-killed and restarted 10 times)"
        );
        assert!(explanation.summary.contains("container worker"));
    }

    #[test]
    fn test_threshold_is_configurable() {
        let mode = builtin_catalog().get(ModeId::OomKilled).unwrap();
        let config = NarratorConfig {
            oom_leak_restart_threshold: 1,
            ..Default::default()
        };
        let explanation = explain(mode, &oom_pod(2), &config);
        assert!(explanation.likely_cause.starts_with(LEAK_CAUSE));
    }
}
