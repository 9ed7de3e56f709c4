//! Matching fact snapshots against failure modes.
//!
//! Every mode's signals are evaluated in declaration order. A failing required
//! signal rules the mode out immediately; optional signals only contribute to
//! the evidence list. Survivors are ranked by a fixed priority so the most
//! specific, actionable cause comes first when several modes hold at once
//! (an OOM-killed container is usually also crash looping).

use super::facts::FactSnapshot;
use super::types::{FailureMode, MatchResult, ModeId};
use std::cmp::Ordering;

/// Priority given to ids without a fixed rank.
pub const UNKNOWN_PRIORITY: u32 = 999;

/// Confidence assigned to every mode whose required signals all hold.
pub const FULL_CONFIDENCE: f64 = 1.0;

/// Rank of a mode id; lower sorts first.
pub fn priority(id: ModeId) -> u32 {
    match id {
        ModeId::OomKilled => 1,
        ModeId::ImagePullBackOff => 2,
        ModeId::ServiceNoEndpoints => 3,
        ModeId::CrashLoopBackOff => 4,
        ModeId::Custom(_) => UNKNOWN_PRIORITY,
    }
}

/// Match a snapshot against `modes`, best match first.
///
/// An empty result means no failure mode was recognized.
pub fn match_modes<'a>(facts: &FactSnapshot, modes: &'a [FailureMode]) -> Vec<MatchResult<'a>> {
    let mut results: Vec<MatchResult<'a>> = modes
        .iter()
        .filter_map(|mode| check_mode(mode, facts))
        .collect();

    results.sort_by(compare_matches);
    results
}

/// Evaluate one mode. `None` when it cannot be evidenced.
pub fn check_mode<'a>(mode: &'a FailureMode, facts: &FactSnapshot) -> Option<MatchResult<'a>> {
    if mode.signals.is_empty() {
        return None;
    }

    let mut matched_signals = Vec::new();

    for signal in &mode.signals {
        if signal.evaluate(facts) {
            matched_signals.push(signal.description);
        } else if signal.required {
            return None;
        }
    }

    Some(MatchResult {
        mode,
        confidence: FULL_CONFIDENCE,
        matched_signals,
    })
}

fn compare_matches(a: &MatchResult<'_>, b: &MatchResult<'_>) -> Ordering {
    priority(a.mode.id)
        .cmp(&priority(b.mode.id))
        .then_with(|| b.confidence.total_cmp(&a.confidence))
}
