//! ImagePullBackOff: the container image cannot be fetched.

use crate::analyzer::facts::{FactSnapshot, ResourceKind};
use crate::analyzer::signals::{Predicate, Signal, SignalPattern, SignalSource};
use crate::analyzer::types::{FailureMode, ModeId};

pub(crate) const PULL_WAITING_REASONS: &[&str] = &["ImagePullBackOff", "ErrImagePull"];

/// Event message fragments reporting a failed pull.
pub(crate) const PULL_FAILURE_MESSAGES: &[&str] = &["Failed to pull image", "image pull failed"];

pub(crate) const PULL_BLOCKED: Predicate =
    Predicate::new("container_image_pull_blocked", pull_blocked);
pub(crate) const PULL_FAILED_EVENT: Predicate =
    Predicate::new("event_image_pull_failed", pull_failed_event);

pub fn mode() -> FailureMode {
    FailureMode {
        id: ModeId::ImagePullBackOff,
        name: "ImagePullBackOff",
        meaning: "Kubernetes cannot retrieve the container image from the registry. The pod cannot start until the image is successfully pulled.",
        common_causes: vec![
            "Image name is incorrect or misspelled",
            "Image tag does not exist in the registry",
            "Private registry credentials are missing or incorrect",
            "Registry is unreachable due to network issues",
            "Rate limit hit on public registry",
        ],
        signals: vec![
            Signal::required(
                SignalSource::Status,
                SignalPattern::Predicate(PULL_BLOCKED),
                "Container status is ImagePullBackOff or ErrImagePull",
            ),
            Signal::optional(
                SignalSource::Event,
                SignalPattern::Predicate(PULL_FAILED_EVENT),
                "Event log contains image pull failure",
            ),
        ],
        next_checks: vec![
            "Verify the image name and tag are correct",
            "Check if the image exists in the registry",
            "For private registries: verify imagePullSecrets are configured",
            "Check network connectivity to the registry",
            "Check for registry rate limits",
        ],
        runbook_tags: vec!["image", "registry"],
        applies_to: ResourceKind::Pod,
    }
}

fn pull_blocked(facts: &FactSnapshot) -> bool {
    facts.as_pod().is_some_and(|pod| {
        pod.containers.iter().any(|container| {
            container
                .waiting_reason()
                .is_some_and(|reason| PULL_WAITING_REASONS.contains(&reason))
        })
    })
}

fn pull_failed_event(facts: &FactSnapshot) -> bool {
    facts.events().iter().any(|event| {
        PULL_FAILURE_MESSAGES
            .iter()
            .any(|fragment| event.message.contains(fragment))
    })
}
