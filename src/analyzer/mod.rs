//! # Analyzer Module
//!
//! Rule-based classification of Kubernetes failures.
//!
//! A [`FactSnapshot`] describes one pod or service. The [`matcher`] checks it
//! against every mode in a [`Catalog`], keeps the modes whose required
//! signals all hold, and ranks them. The [`Narrator`] then explains the top
//! match using only the facts in the snapshot.
//!
//! # Example
//!
//! ```rust,ignore
//! use kube_why::analyzer::{builtin_catalog, match_modes, Narrator};
//!
//! let matches = match_modes(&facts, builtin_catalog().modes());
//! if let Some(top) = matches.first() {
//!     let explanation = Narrator::default().explain(top.mode, &facts);
//!     println!("{}", explanation.likely_cause);
//! }
//! ```
//!
//! Nothing in this module performs I/O or logs; gathering facts and printing
//! results is left to the callers.

// ============================================================================
// Core modules
// ============================================================================

/// Fact snapshot types.
pub mod facts;

/// Failure-mode, match and explanation types.
pub mod types;

/// Signal definitions and evaluation.
pub mod signals;

/// Built-in failure modes and the catalog builder.
pub mod catalog;

/// Matching and ranking.
pub mod matcher;

/// Evidence-backed explanations.
pub mod narrator;

// ============================================================================
// Presentation
// ============================================================================

/// Output formatting (table, JSON, YAML, summary).
pub mod formatter;

// ============================================================================
// Re-exports
// ============================================================================

pub use catalog::{Catalog, CatalogBuilder, builtin_catalog};
pub use facts::{
    ContainerFacts, EndpointAddress, EndpointSubset, EventFacts, FactSnapshot, OwnerReference,
    PodFacts, ResourceKind, ResourceMeta, ServiceFacts, TerminatedState, WaitingState,
};
pub use formatter::{OutputFormat, format_report, format_report_to_string};
pub use matcher::{match_modes, priority};
pub use narrator::{Narrator, NarratorConfig};
pub use signals::{Predicate, Signal, SignalPattern, SignalSource};
pub use types::{
    ExplainReport, Explanation, FailureMode, MatchResult, ModeId, ReportStatus,
};
