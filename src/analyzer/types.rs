//! Core types shared by the catalog, matcher and narrator.
//!
//! - `ModeId` - Stable failure-mode identifiers (e.g., "oom-killed")
//! - `FailureMode` - A catalogued hypothesis with its signals and guidance
//! - `MatchResult` - A failure mode that matched a snapshot
//! - `Explanation` - The narrated, evidence-backed answer
//! - `ExplainReport` - What gets rendered for one resource

use super::facts::ResourceKind;
use super::signals::Signal;
use serde::{Serialize, Serializer};
use std::fmt;

/// Identifier of a failure mode.
///
/// Built-in modes have their own variant so narration dispatch is checked
/// exhaustively; modes added at runtime use `Custom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeId {
    CrashLoopBackOff,
    ImagePullBackOff,
    OomKilled,
    ServiceNoEndpoints,
    Custom(&'static str),
}

impl ModeId {
    /// Every built-in id, in catalog registration order.
    pub const BUILTIN: [ModeId; 4] = [
        ModeId::CrashLoopBackOff,
        ModeId::ImagePullBackOff,
        ModeId::OomKilled,
        ModeId::ServiceNoEndpoints,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CrashLoopBackOff => "crash-loop-back-off",
            Self::ImagePullBackOff => "image-pull-back-off",
            Self::OomKilled => "oom-killed",
            Self::ServiceNoEndpoints => "service-no-endpoints",
            Self::Custom(id) => id,
        }
    }

    /// Parse a built-in id. Unknown strings return `None`.
    pub fn parse(s: &str) -> Option<Self> {
        Self::BUILTIN
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ModeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A catalogued failure mode.
#[derive(Debug, Clone, Serialize)]
pub struct FailureMode {
    pub id: ModeId,
    /// Display name, e.g. "CrashLoopBackOff".
    pub name: &'static str,
    /// What the condition means, in plain language.
    pub meaning: &'static str,
    /// Candidate causes, most likely first. The first entry is the default.
    pub common_causes: Vec<&'static str>,
    pub signals: Vec<Signal>,
    pub next_checks: Vec<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runbook_tags: Vec<&'static str>,
    /// Kind of resource whose snapshots this mode can describe.
    pub applies_to: ResourceKind,
}

impl FailureMode {
    /// Default cause when no refinement rule applies.
    pub fn default_cause(&self) -> &'static str {
        self.common_causes.first().copied().unwrap_or("unknown")
    }
}

/// A failure mode that matched a snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<'a> {
    #[serde(serialize_with = "serialize_mode_summary")]
    pub mode: &'a FailureMode,
    /// Match strength between 0.0 and 1.0.
    pub confidence: f64,
    /// Descriptions of the signals that held, in declaration order.
    pub matched_signals: Vec<&'static str>,
}

fn serialize_mode_summary<S: Serializer>(
    mode: &&FailureMode,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("FailureMode", 2)?;
    state.serialize_field("id", &mode.id)?;
    state.serialize_field("name", mode.name)?;
    state.end()
}

/// An evidence-backed explanation of a matched failure mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub summary: String,
    pub meaning: String,
    pub likely_cause: String,
    pub evidence: Vec<String>,
    pub impact: String,
    pub next_checks: Vec<String>,
}

// ============================================================================
// Report
// ============================================================================

/// Overall verdict of one explain run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    FailureDetected,
    Healthy,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailureDetected => "failure_detected",
            Self::Healthy => "healthy",
        }
    }
}

/// Everything the presentation layer needs about one resource.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainReport<'a> {
    /// `kind/namespace/name` of the inspected resource.
    pub resource: String,
    pub kind: ResourceKind,
    pub status: ReportStatus,
    /// Matches, best first. Trimmed to the top match unless all were requested.
    pub matches: Vec<MatchResult<'a>>,
    /// Narration of the top match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Explanation>,
}

impl<'a> ExplainReport<'a> {
    pub fn has_failure(&self) -> bool {
        self.status == ReportStatus::FailureDetected
    }

    pub fn top_match(&self) -> Option<&MatchResult<'a>> {
        self.matches.first()
    }
}
