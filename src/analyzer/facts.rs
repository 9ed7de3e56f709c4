//! Fact snapshots: the observed state of one resource at a point in time.
//!
//! A snapshot is assembled by the gatherer (or loaded from a file) and handed
//! to the matcher and narrator by shared reference. Nothing in the analyzer
//! mutates it.
//!
//! Snapshots serialize with an internal `kind` tag so they can be stored and
//! replayed:
//!
//! ```yaml
//! kind: pod
//! meta:
//!   name: payment-service-x829s
//!   namespace: production
//! containers:
//!   - name: payment-service
//!     restart_count: 14
//!     waiting:
//!       reason: CrashLoopBackOff
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Owner kinds that keep several replicas of a pod running.
const REPLICATING_OWNER_KINDS: &[&str] = &["ReplicaSet", "ReplicationController", "StatefulSet"];

/// Which kind of resource a snapshot (or a failure mode) is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Pod,
    Service,
}

impl ResourceKind {
    /// Parse a resource kind from its CLI spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pod" | "pods" | "po" => Some(Self::Pod),
            "svc" | "service" | "services" => Some(Self::Service),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pod => "pod",
            Self::Service => "service",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Snapshot of one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FactSnapshot {
    Pod(PodFacts),
    Service(ServiceFacts),
}

impl FactSnapshot {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Pod(_) => ResourceKind::Pod,
            Self::Service(_) => ResourceKind::Service,
        }
    }

    pub fn meta(&self) -> &ResourceMeta {
        match self {
            Self::Pod(pod) => &pod.meta,
            Self::Service(service) => &service.meta,
        }
    }

    pub fn as_pod(&self) -> Option<&PodFacts> {
        match self {
            Self::Pod(pod) => Some(pod),
            Self::Service(_) => None,
        }
    }

    pub fn as_service(&self) -> Option<&ServiceFacts> {
        match self {
            Self::Service(service) => Some(service),
            Self::Pod(_) => None,
        }
    }

    /// Recent events for the resource. Services carry none.
    pub fn events(&self) -> &[EventFacts] {
        match self {
            Self::Pod(pod) => &pod.events,
            Self::Service(_) => &[],
        }
    }

    /// Human-readable identifier such as `pod/production/payment-service-x829s`.
    pub fn identifier(&self) -> String {
        let meta = self.meta();
        format!(
            "{}/{}/{}",
            self.kind(),
            meta.namespace_or_unknown(),
            meta.name_or_unknown()
        )
    }
}

impl From<PodFacts> for FactSnapshot {
    fn from(pod: PodFacts) -> Self {
        Self::Pod(pod)
    }
}

impl From<ServiceFacts> for FactSnapshot {
    fn from(service: ServiceFacts) -> Self {
        Self::Service(service)
    }
}

/// Identity shared by pods and services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub owner_references: Vec<OwnerReference>,
}

impl ResourceMeta {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            owner_references: Vec::new(),
        }
    }

    pub fn with_owner(mut self, kind: impl Into<String>, name: impl Into<String>) -> Self {
        self.owner_references.push(OwnerReference {
            kind: kind.into(),
            name: name.into(),
        });
        self
    }

    pub fn name_or_unknown(&self) -> &str {
        non_empty_or_unknown(&self.name)
    }

    pub fn namespace_or_unknown(&self) -> &str {
        non_empty_or_unknown(&self.namespace)
    }

    /// Whether a replicating controller owns this resource.
    pub fn has_replicating_owner(&self) -> bool {
        self.owner_references
            .iter()
            .any(|owner| REPLICATING_OWNER_KINDS.contains(&owner.kind.as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerReference {
    pub kind: String,
    pub name: String,
}

/// Facts about a pod.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PodFacts {
    pub meta: ResourceMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default)]
    pub containers: Vec<ContainerFacts>,
    #[serde(default)]
    pub events: Vec<EventFacts>,
    /// Recent log text keyed by container name.
    #[serde(default)]
    pub logs: BTreeMap<String, String>,
}

impl PodFacts {
    pub fn new(meta: ResourceMeta) -> Self {
        Self {
            meta,
            ..Default::default()
        }
    }

    pub fn logs_for(&self, container: &str) -> &str {
        self.logs.get(container).map(String::as_str).unwrap_or("")
    }

    /// All container logs joined in container-name order.
    pub fn all_logs(&self) -> String {
        self.logs.values().map(String::as_str).collect::<Vec<_>>().join("\n")
    }
}

/// Status of one container in a pod.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerFacts {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub ready: bool,
    #[serde(default)]
    pub restart_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waiting: Option<WaitingState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_terminated: Option<TerminatedState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_request: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_limit: Option<String>,
}

impl ContainerFacts {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn waiting_reason(&self) -> Option<&str> {
        self.waiting.as_ref().and_then(|w| w.reason.as_deref())
    }

    pub fn waiting_message(&self) -> Option<&str> {
        self.waiting.as_ref().and_then(|w| w.message.as_deref())
    }

    pub fn last_exit_code(&self) -> Option<i32> {
        self.last_terminated.as_ref().map(|t| t.exit_code)
    }

    pub fn last_termination_reason(&self) -> Option<&str> {
        self.last_terminated
            .as_ref()
            .and_then(|t| t.reason.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitingState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WaitingState {
    pub fn reason(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
            message: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminatedState {
    pub exit_code: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TerminatedState {
    pub fn new(exit_code: i32, reason: Option<&str>) -> Self {
        Self {
            exit_code,
            reason: reason.map(str::to_string),
        }
    }
}

/// A cluster event recorded against the resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventFacts {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

impl EventFacts {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }
}

/// Facts about a service and its endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFacts {
    pub meta: ResourceMeta,
    #[serde(default)]
    pub selector: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub subsets: Vec<EndpointSubset>,
}

impl ServiceFacts {
    pub fn new(meta: ResourceMeta) -> Self {
        Self {
            meta,
            ..Default::default()
        }
    }

    pub fn ready_address_count(&self) -> usize {
        self.subsets.iter().map(|s| s.addresses.len()).sum()
    }

    pub fn not_ready_address_count(&self) -> usize {
        self.subsets.iter().map(|s| s.not_ready_addresses.len()).sum()
    }

    /// Selector rendered as `key=value,key=value`.
    pub fn selector_string(&self) -> String {
        self.selector
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointSubset {
    #[serde(default)]
    pub addresses: Vec<EndpointAddress>,
    #[serde(default)]
    pub not_ready_addresses: Vec<EndpointAddress>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointAddress {
    pub ip: String,
    /// Name of the backing pod, when the endpoint references one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

fn non_empty_or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "unknown"
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_yaml_tagging() {
        let yaml = r#"
kind: pod
meta:
  name: web-1
  namespace: shop
containers:
  - name: web
    restart_count: 2
    last_terminated:
      exit_code: 1
      reason: Error
"#;
        let facts: FactSnapshot = serde_yaml::from_str(yaml).unwrap();
        let pod = facts.as_pod().unwrap();
        assert_eq!(pod.containers[0].last_exit_code(), Some(1));
        assert!(pod.events.is_empty());
        assert_eq!(facts.identifier(), "pod/shop/web-1");
    }

    #[test]
    fn test_service_snapshot_has_no_events() {
        let facts = FactSnapshot::from(ServiceFacts::new(ResourceMeta::new("api", "prod")));
        assert!(facts.events().is_empty());
        assert!(facts.as_pod().is_none());
        assert_eq!(facts.kind(), ResourceKind::Service);
    }

    #[test]
    fn test_replicating_owner() {
        let meta = ResourceMeta::new("p", "ns").with_owner("ReplicaSet", "web-5d9c");
        assert!(meta.has_replicating_owner());

        let meta = ResourceMeta::new("p", "ns").with_owner("Job", "migrate");
        assert!(!meta.has_replicating_owner());
    }

    #[test]
    fn test_placeholders_for_missing_identity() {
        let meta = ResourceMeta::default();
        assert_eq!(meta.name_or_unknown(), "unknown");
        assert_eq!(meta.namespace_or_unknown(), "unknown");
    }

    #[test]
    fn test_resource_kind_parse() {
        assert_eq!(ResourceKind::parse("svc"), Some(ResourceKind::Service));
        assert_eq!(ResourceKind::parse("Pod"), Some(ResourceKind::Pod));
        assert_eq!(ResourceKind::parse("deployment"), None);
    }

    #[test]
    fn test_selector_string_is_sorted() {
        let mut service = ServiceFacts::new(ResourceMeta::new("api", "prod"));
        service.selector.insert("tier".into(), "backend".into());
        service.selector.insert("app".into(), "api".into());
        assert_eq!(service.selector_string(), "app=api,tier=backend");
    }
}
