//! Fact gathering.
//!
//! Builds [`FactSnapshot`]s either from a live cluster through the Kubernetes
//! API ([`FactGatherer`]) or from a snapshot file on disk
//! ([`load_snapshot`]). Conversions from API objects live in [`convert`] and
//! are pure, so they can be tested without a cluster.
//!
//! # Prerequisites
//!
//! - Valid kubeconfig (uses the current context or the one specified)
//! - RBAC permissions to read pods, pod logs, events, services and endpoints
//!
//! # Example
//!
//! ```rust,ignore
//! use kube_why::gather::{FactGatherer, GatherOptions};
//!
//! let gatherer = FactGatherer::new(GatherOptions::default()).await?;
//! let facts = gatherer.gather_pod("payment-7f9c", "production").await?;
//! ```

pub mod client;
pub mod convert;
pub mod snapshot;

pub use client::FactGatherer;
pub use snapshot::{load_snapshot, parse_snapshot};

use std::path::PathBuf;
use std::time::Duration;

/// Error type for fact gathering.
#[derive(Debug, thiserror::Error)]
pub enum GatherError {
    #[error("Failed to create Kubernetes client: {0}")]
    ClientCreation(#[from] kube::Error),

    #[error("Failed to infer Kubernetes config: {0}")]
    ConfigError(#[from] kube::config::InferConfigError),

    #[error("Failed to read kubeconfig: {0}")]
    KubeconfigError(#[from] kube::config::KubeconfigError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API request failed: {0}")]
    ApiError(String),

    #[error("Timed out after {secs}s: {what}")]
    Timeout { what: String, secs: u64 },

    #[error("Failed to read snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot {path}: {message}")]
    SnapshotParse { path: PathBuf, message: String },
}

/// How the gatherer talks to the API server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatherOptions {
    /// Lines of log tail fetched per container.
    pub log_tail_lines: i64,
    /// Deadline for each API call.
    pub request_timeout: Duration,
    /// Extra attempts after a failed or timed-out call.
    pub retries: u32,
}

impl Default for GatherOptions {
    fn default() -> Self {
        Self {
            log_tail_lines: 50,
            request_timeout: Duration::from_secs(10),
            retries: 1,
        }
    }
}

impl GatherOptions {
    pub fn with_log_tail_lines(mut self, lines: i64) -> Self {
        self.log_tail_lines = lines;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = GatherOptions::default();
        assert_eq!(options.log_tail_lines, 50);
        assert_eq!(options.request_timeout, Duration::from_secs(10));
        assert_eq!(options.retries, 1);
    }

    #[test]
    fn test_builder_overrides() {
        let options = GatherOptions::default()
            .with_log_tail_lines(200)
            .with_request_timeout(Duration::from_secs(3))
            .with_retries(0);
        assert_eq!(options.log_tail_lines, 200);
        assert_eq!(options.request_timeout.as_secs(), 3);
        assert_eq!(options.retries, 0);
    }

    #[test]
    fn test_error_messages() {
        let err = GatherError::Timeout {
            what: "get pod default/web".to_string(),
            secs: 10,
        };
        assert_eq!(err.to_string(), "Timed out after 10s: get pod default/web");
        assert_eq!(
            GatherError::NotFound("pod default/web".to_string()).to_string(),
            "Not found: pod default/web"
        );
    }
}
