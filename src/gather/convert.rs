//! Conversions from Kubernetes API objects into facts.

use crate::analyzer::facts::{
    ContainerFacts, EndpointAddress, EndpointSubset, EventFacts, OwnerReference, PodFacts,
    ResourceMeta, ServiceFacts, TerminatedState, WaitingState,
};
use k8s_openapi::api::core::v1::{
    Container, ContainerStateTerminated, ContainerStateWaiting, ContainerStatus, Endpoints, Event,
    Pod, Service,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

/// Metadata shared by pods and services.
pub fn resource_meta(metadata: &ObjectMeta) -> ResourceMeta {
    ResourceMeta {
        name: metadata.name.clone().unwrap_or_default(),
        namespace: metadata.namespace.clone().unwrap_or_default(),
        owner_references: metadata
            .owner_references
            .iter()
            .flatten()
            .map(|owner| OwnerReference {
                kind: owner.kind.clone(),
                name: owner.name.clone(),
            })
            .collect(),
    }
}

/// Pod facts without logs; the gatherer fills those in per container.
pub fn pod_facts(pod: &Pod, events: Vec<EventFacts>) -> PodFacts {
    let spec_containers = pod
        .spec
        .as_ref()
        .map(|spec| spec.containers.as_slice())
        .unwrap_or_default();

    let status = pod.status.as_ref();

    let containers = status
        .and_then(|s| s.container_statuses.as_ref())
        .into_iter()
        .flatten()
        .map(|cs| {
            let spec = spec_containers.iter().find(|c| c.name == cs.name);
            container_facts(cs, spec)
        })
        .collect();

    PodFacts {
        meta: resource_meta(&pod.metadata),
        phase: status.and_then(|s| s.phase.clone()),
        containers,
        events,
        logs: Default::default(),
    }
}

/// One container status, enriched with memory sizing from its spec.
pub fn container_facts(status: &ContainerStatus, spec: Option<&Container>) -> ContainerFacts {
    let waiting = status
        .state
        .as_ref()
        .and_then(|state| state.waiting.as_ref())
        .map(waiting_state);

    // Prefer the previous termination; a container that has not restarted may
    // still be terminated right now.
    let last_terminated = status
        .last_state
        .as_ref()
        .and_then(|state| state.terminated.as_ref())
        .or_else(|| {
            status
                .state
                .as_ref()
                .and_then(|state| state.terminated.as_ref())
        })
        .map(terminated_state);

    let resources = spec.and_then(|c| c.resources.as_ref());
    let memory_request = resources
        .and_then(|r| r.requests.as_ref())
        .and_then(|req| req.get("memory"))
        .map(|q| q.0.clone());
    let memory_limit = resources
        .and_then(|r| r.limits.as_ref())
        .and_then(|lim| lim.get("memory"))
        .map(|q| q.0.clone());

    ContainerFacts {
        name: status.name.clone(),
        image: Some(status.image.clone()).filter(|image| !image.is_empty()),
        ready: status.ready,
        restart_count: u32::try_from(status.restart_count).unwrap_or(0),
        waiting,
        last_terminated,
        memory_request,
        memory_limit,
    }
}

fn waiting_state(waiting: &ContainerStateWaiting) -> WaitingState {
    WaitingState {
        reason: waiting.reason.clone(),
        message: waiting.message.clone(),
    }
}

fn terminated_state(terminated: &ContainerStateTerminated) -> TerminatedState {
    TerminatedState {
        exit_code: terminated.exit_code,
        reason: terminated.reason.clone(),
    }
}

pub fn event_facts(event: &Event) -> EventFacts {
    EventFacts {
        message: event.message.clone().unwrap_or_default(),
        reason: event.reason.clone(),
        event_type: event.type_.clone(),
        count: event.count.and_then(|count| u32::try_from(count).ok()),
    }
}

/// Service facts. A missing Endpoints object means no subsets.
pub fn service_facts(service: &Service, endpoints: Option<&Endpoints>) -> ServiceFacts {
    let spec = service.spec.as_ref();

    ServiceFacts {
        meta: resource_meta(&service.metadata),
        selector: spec
            .and_then(|s| s.selector.clone())
            .unwrap_or_default(),
        service_type: spec.and_then(|s| s.type_.clone()),
        subsets: endpoints
            .and_then(|ep| ep.subsets.as_ref())
            .into_iter()
            .flatten()
            .map(|subset| EndpointSubset {
                addresses: endpoint_addresses(subset.addresses.as_deref()),
                not_ready_addresses: endpoint_addresses(subset.not_ready_addresses.as_deref()),
            })
            .collect(),
    }
}

fn endpoint_addresses(
    addresses: Option<&[k8s_openapi::api::core::v1::EndpointAddress]>,
) -> Vec<EndpointAddress> {
    addresses
        .unwrap_or_default()
        .iter()
        .map(|address| EndpointAddress {
            ip: address.ip.clone(),
            target: address
                .target_ref
                .as_ref()
                .and_then(|target| target.name.clone()),
        })
        .collect()
}
