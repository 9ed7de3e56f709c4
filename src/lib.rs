//! # kube-why
//!
//! Explains why a Kubernetes pod or service is unhealthy.
//!
//! ## Features
//!
//! - **Failure catalog**: CrashLoopBackOff, ImagePullBackOff, OOMKilled and
//!   services without ready endpoints, extensible with custom modes
//! - **Ranked matching**: the most specific failure wins when several hold
//! - **Evidence-backed narration**: likely cause, impact and next checks drawn
//!   from status, events and logs
//! - **Offline replay**: explain a snapshot file without cluster access
//! - **Multiple formats**: table, summary, JSON and YAML
//!
//! ## Example
//!
//! ```rust,no_run
//! use kube_why::analyzer::{builtin_catalog, match_modes, Narrator};
//! use kube_why::gather::load_snapshot;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let facts = load_snapshot(Path::new("payment.yaml"))?;
//! let matches = match_modes(&facts, builtin_catalog().modes());
//! if let Some(top) = matches.first() {
//!     let explanation = Narrator::default().explain(top.mode, &facts);
//!     println!("{}: {}", top.mode.name, explanation.likely_cause);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod gather;
pub mod handlers;

// Re-export commonly used types and functions
pub use analyzer::{Explanation, FactSnapshot, MatchResult, Narrator, builtin_catalog, match_modes};
pub use error::{KubeWhyError, Result};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
