//! Failure-mode catalog.
//!
//! Each built-in mode lives in its own module and exposes a `mode()`
//! constructor plus the predicates its signals use. The catalog is assembled
//! once and never changes afterwards; extra modes are appended through
//! [`CatalogBuilder`].

mod crash_loop;
mod image_pull;
mod oom_killed;
mod service_no_endpoints;

use crate::analyzer::facts::ResourceKind;
use crate::analyzer::types::{FailureMode, ModeId};
use once_cell::sync::Lazy;

pub(crate) use crash_loop::SIGKILL_EXIT_CODE;
pub(crate) use image_pull::{PULL_FAILURE_MESSAGES, PULL_WAITING_REASONS};
pub(crate) use oom_killed::OOM_REASON;

// ============================================================================
// Catalog
// ============================================================================

/// An ordered, read-only collection of failure modes.
#[derive(Debug, Clone)]
pub struct Catalog {
    modes: Vec<FailureMode>,
}

static BUILTIN: Lazy<Catalog> = Lazy::new(|| CatalogBuilder::with_builtins().build());

/// The process-wide catalog of built-in failure modes.
pub fn builtin_catalog() -> &'static Catalog {
    &BUILTIN
}

impl Catalog {
    /// All modes in registration order.
    pub fn modes(&self) -> &[FailureMode] {
        &self.modes
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Look a mode up by id.
    pub fn get(&self, id: ModeId) -> Option<&FailureMode> {
        self.modes.iter().find(|mode| mode.id == id)
    }

    /// Modes that can describe a snapshot of the given kind, in order.
    pub fn modes_for(&self, kind: ResourceKind) -> Vec<FailureMode> {
        self.modes
            .iter()
            .filter(|mode| mode.applies_to == kind)
            .cloned()
            .collect()
    }

    /// A copy of this catalog without the given mode ids.
    pub fn without(&self, ignored: &[String]) -> Catalog {
        Catalog {
            modes: self
                .modes
                .iter()
                .filter(|mode| !ignored.iter().any(|id| id == mode.id.as_str()))
                .cloned()
                .collect(),
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Assembles a catalog before it is frozen.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    modes: Vec<FailureMode>,
}

impl CatalogBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder seeded with the built-in modes.
    pub fn with_builtins() -> Self {
        Self {
            modes: builtin_modes(),
        }
    }

    /// Append a mode after those already registered.
    pub fn with_mode(mut self, mode: FailureMode) -> Self {
        self.modes.push(mode);
        self
    }

    pub fn build(self) -> Catalog {
        Catalog { modes: self.modes }
    }
}

/// Built-in failure modes in registration order.
pub fn builtin_modes() -> Vec<FailureMode> {
    vec![
        crash_loop::mode(),
        image_pull::mode(),
        oom_killed::mode(),
        service_no_endpoints::mode(),
    ]
}
