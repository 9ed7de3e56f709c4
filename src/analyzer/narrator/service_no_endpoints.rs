//! ServiceNoEndpoints narrative.

use super::{NarratorConfig, next_checks};
use crate::analyzer::facts::ServiceFacts;
use crate::analyzer::types::{Explanation, FailureMode};

const READINESS_CAUSE: &str = "Pods match the selector but are failing readiness checks";
const NO_SELECTOR_CAUSE: &str =
    "Service has no selector, so endpoints must be managed manually and none are registered";

pub(super) fn explain(
    mode: &FailureMode,
    service: &ServiceFacts,
    config: &NarratorConfig,
) -> Explanation {
    let not_ready = service.not_ready_address_count();

    let mut evidence = Vec::new();
    if let Some(service_type) = &service.service_type {
        evidence.push(format!("Service type: {}", service_type));
    }
    if service.selector.is_empty() {
        evidence.push("Selector: none".to_string());
    } else {
        evidence.push(format!("Selector: {}", service.selector_string()));
    }
    evidence.push(format!("Endpoints: {} found", service.ready_address_count()));

    if not_ready > 0 {
        evidence.push(format!("Not-ready endpoints: {}", not_ready));
        evidence.extend(
            service
                .subsets
                .iter()
                .flat_map(|subset| subset.not_ready_addresses.iter())
                .take(config.max_address_evidence)
                .map(|address| match &address.target {
                    Some(target) => format!("Not ready: {} ({})", target, address.ip),
                    None => format!("Not ready: {}", address.ip),
                }),
        );
    }

    let likely_cause = if not_ready > 0 {
        READINESS_CAUSE
    } else if service.selector.is_empty() {
        NO_SELECTOR_CAUSE
    } else {
        mode.default_cause()
    };

    let name = service.meta.name_or_unknown();

    Explanation {
        summary: format!(
            "Service {} in namespace {} has no ready endpoints.",
            name,
            service.meta.namespace_or_unknown()
        ),
        meaning: mode.meaning.to_string(),
        likely_cause: likely_cause.to_string(),
        evidence,
        impact: format!(
            "All requests to Service {} will fail until at least one backing pod is ready.",
            name
        ),
        next_checks: next_checks(mode),
    }
}
