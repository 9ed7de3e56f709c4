//! Signals: the units of evidence a failure mode is built from.
//!
//! A signal is either a literal searched for in event messages or a named
//! predicate over the whole snapshot. Predicates are plain functions, so a
//! signal carries no hidden state and can be logged or serialized by its
//! description and predicate name alone.

use super::facts::FactSnapshot;
use serde::{Serialize, Serializer};
use std::fmt;

/// Where a signal's evidence comes from.
///
/// Only `Event` gives a literal pattern meaning; the other sources are
/// expressed through predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalSource {
    Event,
    Status,
    Log,
    Metric,
}

/// A named check over a fact snapshot.
#[derive(Clone, Copy)]
pub struct Predicate {
    name: &'static str,
    check: fn(&FactSnapshot) -> bool,
}

impl Predicate {
    pub const fn new(name: &'static str, check: fn(&FactSnapshot) -> bool) -> Self {
        Self { name, check }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn evaluate(&self, facts: &FactSnapshot) -> bool {
        (self.check)(facts)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Predicate({})", self.name)
    }
}

impl PartialEq for Predicate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Predicate {}

impl Serialize for Predicate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// What a signal looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalPattern {
    /// Case-sensitive substring of any event message.
    Contains(&'static str),
    Predicate(Predicate),
}

/// One unit of evidence for a failure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Signal {
    pub source: SignalSource,
    pub pattern: SignalPattern,
    pub required: bool,
    pub description: &'static str,
}

impl Signal {
    /// A signal that must hold for its mode to match.
    pub const fn required(
        source: SignalSource,
        pattern: SignalPattern,
        description: &'static str,
    ) -> Self {
        Self {
            source,
            pattern,
            required: true,
            description,
        }
    }

    /// A signal that only adds evidence.
    pub const fn optional(
        source: SignalSource,
        pattern: SignalPattern,
        description: &'static str,
    ) -> Self {
        Self {
            source,
            pattern,
            required: false,
            description,
        }
    }

    pub fn evaluate(&self, facts: &FactSnapshot) -> bool {
        evaluate(self, facts)
    }
}

/// Evaluate a signal against a snapshot.
///
/// Total: combinations without a meaning (a literal with a non-event source)
/// evaluate to `false`.
pub fn evaluate(signal: &Signal, facts: &FactSnapshot) -> bool {
    match (&signal.pattern, signal.source) {
        (SignalPattern::Predicate(predicate), _) => predicate.evaluate(facts),
        (SignalPattern::Contains(literal), SignalSource::Event) => facts
            .events()
            .iter()
            .any(|event| event.message.contains(literal)),
        (SignalPattern::Contains(_), _) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::facts::{EventFacts, PodFacts, ResourceMeta, ServiceFacts};

    fn pod_with_events(messages: &[&str]) -> FactSnapshot {
        let mut pod = PodFacts::new(ResourceMeta::new("web", "default"));
        pod.events = messages.iter().map(|m| EventFacts::message(*m)).collect();
        pod.into()
    }

    #[test]
    fn test_event_literal_matches_substring() {
        let facts = pod_with_events(&["Back-off restarting failed container web"]);
        let signal = Signal::optional(
            SignalSource::Event,
            SignalPattern::Contains("Back-off restarting"),
            "back-off",
        );
        assert!(signal.evaluate(&facts));
    }

    #[test]
    fn test_event_literal_is_case_sensitive() {
        let facts = pod_with_events(&["back-off restarting failed container"]);
        let signal = Signal::optional(
            SignalSource::Event,
            SignalPattern::Contains("Back-off"),
            "back-off",
        );
        assert!(!signal.evaluate(&facts));
    }

    #[test]
    fn test_literal_with_non_event_source_never_matches() {
        let facts = pod_with_events(&["OOMKilled"]);
        for source in [SignalSource::Status, SignalSource::Log, SignalSource::Metric] {
            let signal = Signal::required(source, SignalPattern::Contains("OOMKilled"), "oom");
            assert!(!signal.evaluate(&facts));
        }
    }

    #[test]
    fn test_literal_against_service_is_false() {
        let facts: FactSnapshot = ServiceFacts::new(ResourceMeta::new("api", "prod")).into();
        let signal = Signal::optional(SignalSource::Event, SignalPattern::Contains(""), "any");
        assert!(!signal.evaluate(&facts));
    }

    #[test]
    fn test_predicate_ignores_declared_source() {
        fn always(_: &FactSnapshot) -> bool {
            true
        }
        let facts = pod_with_events(&[]);
        let signal = Signal::required(
            SignalSource::Metric,
            SignalPattern::Predicate(Predicate::new("always", always)),
            "always",
        );
        assert!(signal.evaluate(&facts));
    }

    #[test]
    fn test_signal_serializes_by_name() {
        fn never(_: &FactSnapshot) -> bool {
            false
        }
        let signal = Signal::required(
            SignalSource::Status,
            SignalPattern::Predicate(Predicate::new("never", never)),
            "never holds",
        );
        let json = serde_json::to_value(signal).unwrap();
        assert_eq!(json["pattern"]["predicate"], "never");
        assert_eq!(json["source"], "status");
        assert_eq!(json["required"], true);
    }
}
