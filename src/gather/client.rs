//! Live fact gathering through the Kubernetes API.
//!
//! Primary objects (the pod, the service, its endpoints) must be readable or
//! gathering fails. Secondary data degrades instead: events that cannot be
//! listed become an empty list and unreadable logs become a placeholder line.

use super::convert;
use super::{GatherError, GatherOptions};
use crate::analyzer::facts::{EventFacts, FactSnapshot, PodFacts, ResourceKind, ServiceFacts};
use k8s_openapi::api::core::v1::{Endpoints, Event, Pod, Service};
use kube::{
    Client, Config,
    api::{Api, ListParams, LogParams},
};
use std::future::Future;

/// Kubernetes client that assembles fact snapshots.
pub struct FactGatherer {
    client: Client,
    options: GatherOptions,
}

impl FactGatherer {
    /// Create a gatherer using the default kubeconfig.
    pub async fn new(options: GatherOptions) -> Result<Self, GatherError> {
        let config = Config::infer().await?;
        let client = Client::try_from(config)?;
        Ok(Self { client, options })
    }

    /// Create a gatherer with a specific kubeconfig context.
    pub async fn with_context(context: &str, options: GatherOptions) -> Result<Self, GatherError> {
        let kubeconfig = kube::config::Kubeconfig::read()?;
        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &kube::config::KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            },
        )
        .await?;
        let client = Client::try_from(config)?;
        Ok(Self { client, options })
    }

    /// Get the current context name.
    pub fn current_context() -> Result<String, GatherError> {
        let kubeconfig = kube::config::Kubeconfig::read()?;
        Ok(kubeconfig
            .current_context
            .unwrap_or_else(|| "default".to_string()))
    }

    /// Gather a snapshot of the named resource.
    pub async fn gather(
        &self,
        kind: ResourceKind,
        name: &str,
        namespace: &str,
    ) -> Result<FactSnapshot, GatherError> {
        match kind {
            ResourceKind::Pod => self.gather_pod(name, namespace).await.map(Into::into),
            ResourceKind::Service => self.gather_service(name, namespace).await.map(Into::into),
        }
    }

    /// Pod status, its events, and a log tail for every container.
    pub async fn gather_pod(&self, name: &str, namespace: &str) -> Result<PodFacts, GatherError> {
        log::info!("Gathering facts for pod {} in {}", name, namespace);

        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod = self
            .call(&format!("pod {}/{}", namespace, name), || pods.get(name))
            .await?;

        let events = self.events_for("Pod", name, namespace).await;
        let mut facts = convert::pod_facts(&pod, events);

        for container in &facts.containers {
            let logs = self
                .container_logs(&pods, name, &container.name, container.restart_count > 0)
                .await;
            facts.logs.insert(container.name.clone(), logs);
        }

        log::debug!(
            "Pod {}/{}: {} containers, {} events",
            namespace,
            name,
            facts.containers.len(),
            facts.events.len()
        );

        Ok(facts)
    }

    /// Service spec and the readiness of its endpoints.
    pub async fn gather_service(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<ServiceFacts, GatherError> {
        log::info!("Gathering facts for service {} in {}", name, namespace);

        let services: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        let service = self
            .call(&format!("service {}/{}", namespace, name), || {
                services.get(name)
            })
            .await?;

        let endpoints_api: Api<Endpoints> = Api::namespaced(self.client.clone(), namespace);
        let endpoints = match self
            .call(&format!("endpoints {}/{}", namespace, name), || {
                endpoints_api.get(name)
            })
            .await
        {
            Ok(endpoints) => Some(endpoints),
            // Selector-less services have no Endpoints object at all.
            Err(GatherError::NotFound(what)) => {
                log::debug!("No {}; treating as empty", what);
                None
            }
            Err(e) => return Err(e),
        };

        Ok(convert::service_facts(&service, endpoints.as_ref()))
    }

    async fn events_for(&self, kind: &str, name: &str, namespace: &str) -> Vec<EventFacts> {
        let events: Api<Event> = Api::namespaced(self.client.clone(), namespace);
        let params = ListParams::default().fields(&format!(
            "involvedObject.name={},involvedObject.kind={}",
            name, kind
        ));

        match self
            .call(&format!("events for {}/{}", namespace, name), || {
                events.list(&params)
            })
            .await
        {
            Ok(list) => list.items.iter().map(convert::event_facts).collect(),
            Err(e) => {
                log::warn!("Failed to get events for {}: {}", name, e);
                Vec::new()
            }
        }
    }

    async fn container_logs(
        &self,
        pods: &Api<Pod>,
        pod_name: &str,
        container: &str,
        previous: bool,
    ) -> String {
        let params = LogParams {
            container: Some(container.to_string()),
            tail_lines: Some(self.options.log_tail_lines),
            previous,
            ..Default::default()
        };

        match self
            .call(&format!("logs for {}/{}", pod_name, container), || {
                pods.logs(pod_name, &params)
            })
            .await
        {
            Ok(logs) => logs,
            Err(e) => {
                log::warn!("Failed to get logs for {}/{}: {}", pod_name, container, e);
                format!("(Unable to retrieve logs: {})", e)
            }
        }
    }

    /// Run one API call under the configured deadline, retrying failures.
    /// Not-found answers are final.
    async fn call<T, F, Fut>(&self, what: &str, op: F) -> Result<T, GatherError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, kube::Error>>,
    {
        let mut attempt = 0;
        loop {
            let err = match tokio::time::timeout(self.options.request_timeout, op()).await {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) if is_not_found(&e) => {
                    return Err(GatherError::NotFound(what.to_string()));
                }
                Ok(Err(e)) => GatherError::ApiError(format!("{}: {}", what, e)),
                Err(_) => GatherError::Timeout {
                    what: what.to_string(),
                    secs: self.options.request_timeout.as_secs(),
                },
            };

            if attempt >= self.options.retries {
                return Err(err);
            }
            attempt += 1;
            log::debug!(
                "{} failed ({}), retrying ({}/{})",
                what,
                err,
                attempt,
                self.options.retries
            );
        }
    }
}

fn is_not_found(err: &kube::Error) -> bool {
    let message = err.to_string();
    message.contains("404") || message.contains("NotFound") || message.contains("not found")
}
