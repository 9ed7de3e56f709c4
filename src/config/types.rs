use crate::analyzer::{ModeId, NarratorConfig, OutputFormat};
use crate::error::ConfigError;
use crate::gather::GatherOptions;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cluster: ClusterConfig,
    pub narration: NarratorConfig,
    pub matching: MatchingConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Reject values that parse but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cluster.log_tail_lines <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "cluster.log_tail_lines".to_string(),
                value: self.cluster.log_tail_lines.to_string(),
            });
        }
        if self.cluster.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "cluster.request_timeout_secs".to_string(),
                value: "0".to_string(),
            });
        }
        if let Some(unknown) = self
            .matching
            .ignore_modes
            .iter()
            .find(|id| ModeId::parse(id).is_none())
        {
            return Err(ConfigError::InvalidValue {
                key: "matching.ignore_modes".to_string(),
                value: unknown.clone(),
            });
        }
        Ok(())
    }
}

/// Cluster access configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Kubeconfig context; the current context when unset.
    pub context: Option<String>,
    pub namespace: String,
    pub log_tail_lines: i64,
    pub request_timeout_secs: u64,
    pub retries: u32,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            context: None,
            namespace: "default".to_string(),
            log_tail_lines: 50,
            request_timeout_secs: 10,
            retries: 1,
        }
    }
}

impl ClusterConfig {
    pub fn gather_options(&self) -> GatherOptions {
        GatherOptions::default()
            .with_log_tail_lines(self.log_tail_lines)
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
            .with_retries(self.retries)
    }
}

/// Matching configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Mode ids never reported, e.g. `["crash-loop-back-off"]`.
    pub ignore_modes: Vec<String>,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            color: true,
        }
    }
}
