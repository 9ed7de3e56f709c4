//! ServiceNoEndpoints: a service with nothing ready behind it.

use crate::analyzer::facts::{FactSnapshot, ResourceKind};
use crate::analyzer::signals::{Predicate, Signal, SignalPattern, SignalSource};
use crate::analyzer::types::{FailureMode, ModeId};

pub(crate) const NO_READY_ENDPOINTS: Predicate =
    Predicate::new("service_without_ready_endpoints", no_ready_endpoints);

pub fn mode() -> FailureMode {
    FailureMode {
        id: ModeId::ServiceNoEndpoints,
        name: "ServiceNoEndpoints",
        meaning: "A Service exists but has no healthy backend pods to route traffic to. All requests to this Service will fail.",
        common_causes: vec![
            "Service selector doesn't match any pod labels",
            "All pods matching the selector are failing or in non-ready state",
            "No pods exist that match the selector",
            "Pods exist but readiness probes are failing",
            "Namespace mismatch",
        ],
        signals: vec![Signal::required(
            SignalSource::Status,
            SignalPattern::Predicate(NO_READY_ENDPOINTS),
            "Service has no healthy endpoints",
        )],
        next_checks: vec![
            "Verify service selector matches pod labels exactly",
            "Check if pods exist with the expected labels",
            "Investigate why matching pods are not ready",
            "Review readiness probe configuration",
            "Ensure pods and service are in the same namespace",
        ],
        runbook_tags: vec!["service", "networking"],
        applies_to: ResourceKind::Service,
    }
}

/// Only service snapshots can match; pods are refused by variant.
fn no_ready_endpoints(facts: &FactSnapshot) -> bool {
    match facts {
        FactSnapshot::Service(service) => {
            service.subsets.is_empty()
                || service.subsets.iter().all(|subset| subset.addresses.is_empty())
        }
        FactSnapshot::Pod(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::facts::{
        EndpointAddress, EndpointSubset, PodFacts, ResourceMeta, ServiceFacts,
    };

    fn service(subsets: Vec<EndpointSubset>) -> FactSnapshot {
        let mut svc = ServiceFacts::new(ResourceMeta::new("api", "prod"));
        svc.subsets = subsets;
        svc.into()
    }

    fn address(ip: &str) -> EndpointAddress {
        EndpointAddress {
            ip: ip.to_string(),
            target: None,
        }
    }

    #[test]
    fn test_no_subsets() {
        assert!(NO_READY_ENDPOINTS.evaluate(&service(vec![])));
    }

    #[test]
    fn test_only_not_ready_addresses() {
        let subset = EndpointSubset {
            addresses: vec![],
            not_ready_addresses: vec![address("10.0.0.4")],
        };
        assert!(NO_READY_ENDPOINTS.evaluate(&service(vec![subset])));
    }

    #[test]
    fn test_one_ready_address_is_healthy() {
        let empty = EndpointSubset::default();
        let ready = EndpointSubset {
            addresses: vec![address("10.0.0.5")],
            not_ready_addresses: vec![],
        };
        assert!(!NO_READY_ENDPOINTS.evaluate(&service(vec![empty, ready])));
    }

    #[test]
    fn test_pod_snapshot_is_refused() {
        let pod: FactSnapshot = PodFacts::new(ResourceMeta::new("api-0", "prod")).into();
        assert!(!NO_READY_ENDPOINTS.evaluate(&pod));
    }
}
