//! Evidence extraction and cause refinement helpers.

use crate::analyzer::facts::{ContainerFacts, EventFacts, PodFacts};

/// Case-insensitive markers of a log line worth quoting.
const ERROR_MARKERS: &[&str] = &["error", "fatal", "exception"];

/// A keyword rule that overrides a mode's default cause.
#[derive(Debug, Clone, Copy)]
pub struct CauseRule {
    /// Lower-case fragments; any one of them triggers the rule.
    pub keywords: &'static [&'static str],
    pub cause: &'static str,
}

impl CauseRule {
    pub const fn new(keywords: &'static [&'static str], cause: &'static str) -> Self {
        Self { keywords, cause }
    }

    fn applies_to(&self, haystack: &str) -> bool {
        self.keywords.iter().any(|keyword| haystack.contains(keyword))
    }
}

/// First rule whose keywords occur in `text` (case-insensitive), else `default`.
pub fn refine_cause(text: &str, rules: &[CauseRule], default: &str) -> String {
    let haystack = text.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.applies_to(&haystack))
        .map(|rule| rule.cause)
        .unwrap_or(default)
        .to_string()
}

/// The last non-blank log line mentioning an error marker, truncated for display.
pub fn last_error_line(logs: &str, max_chars: usize) -> Option<String> {
    logs.lines()
        .rev()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .find(|line| {
            let lower = line.to_lowercase();
            ERROR_MARKERS.iter().any(|marker| lower.contains(marker))
        })
        .map(|line| truncate_chars(line, max_chars))
}

/// Truncate to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Events whose message contains any of `needles`, in recorded order.
pub fn events_containing<'a>(events: &'a [EventFacts], needles: &[&str]) -> Vec<&'a EventFacts> {
    events
        .iter()
        .filter(|event| needles.iter().any(|needle| event.message.contains(needle)))
        .collect()
}

/// Quote at most `cap` event messages as evidence lines.
pub fn event_lines(events: &[&EventFacts], cap: usize) -> Vec<String> {
    events
        .iter()
        .take(cap)
        .map(|event| match event.count {
            Some(count) if count > 1 => format!("Event (x{}): {}", count, event.message),
            _ => format!("Event: {}", event.message),
        })
        .collect()
}

/// The first container satisfying `pred`, falling back to the first container.
pub fn focus_container<'a>(
    pod: &'a PodFacts,
    pred: impl Fn(&ContainerFacts) -> bool,
) -> Option<&'a ContainerFacts> {
    pod.containers
        .iter()
        .find(|container| pred(*container))
        .or_else(|| pod.containers.first())
}
