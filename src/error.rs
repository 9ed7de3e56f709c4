//! Error types for kube-why
//!
//! The analyzer itself cannot fail; errors come from gathering facts,
//! loading configuration, and talking to the terminal.

use crate::gather::GatherError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error for the CLI.
#[derive(Debug, Error)]
pub enum KubeWhyError {
    #[error("{0}")]
    Gather(#[from] GatherError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad combination of command-line arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors while loading `.kube-why.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    ParsingFailed { path: PathBuf, message: String },

    /// A value that parses but makes no sense, e.g. an unknown output format
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Result type alias for kube-why operations
pub type Result<T> = std::result::Result<T, KubeWhyError>;
