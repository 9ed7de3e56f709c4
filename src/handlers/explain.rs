//! Handler for the `explain` command.
//!
//! Gathers facts (from the cluster or a snapshot file), matches them against
//! the catalog, narrates the top match and prints the report.

use crate::analyzer::{
    ExplainReport, FactSnapshot, FailureMode, Narrator, OutputFormat, ReportStatus, ResourceKind,
    builtin_catalog, format_report_to_string, match_modes,
};
use crate::config::Config;
use crate::error::{KubeWhyError, Result};
use crate::gather::{FactGatherer, GatherError, load_snapshot};
use std::path::PathBuf;

/// Configuration for the explain command
#[derive(Debug, Clone)]
pub struct ExplainOptions {
    pub kind: ResourceKind,
    pub name: String,
    /// Target namespace; the configured default when unset
    pub namespace: Option<String>,
    /// Kubeconfig context; the configured or current context when unset
    pub context: Option<String>,
    /// Snapshot file to replay instead of querying the cluster
    pub facts: Option<PathBuf>,
    /// Output format; the configured format when unset
    pub format: Option<OutputFormat>,
    /// Report every match instead of only the top one
    pub all: bool,
}

impl ExplainOptions {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: None,
            context: None,
            facts: None,
            format: None,
            all: false,
        }
    }
}

/// Handle the explain command. Returns the report status.
pub async fn handle_explain(options: ExplainOptions, config: &Config) -> Result<ReportStatus> {
    let namespace = options
        .namespace
        .clone()
        .unwrap_or_else(|| config.cluster.namespace.clone());

    let facts = match &options.facts {
        Some(path) => snapshot_facts(&options, path)?,
        None => live_facts(&options, &namespace, config).await?,
    };

    let catalog = builtin_catalog().without(&config.matching.ignore_modes);
    let modes = catalog.modes_for(facts.kind());
    let narrator = Narrator::new(config.narration.clone());

    let report = build_report(&facts, &modes, &narrator, options.all);
    log::info!(
        "{}: {} ({} matching modes)",
        report.resource,
        report.status.as_str(),
        report.matches.len()
    );

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = options.format.unwrap_or(config.output.format);
    println!("{}", format_report_to_string(&report, format));

    Ok(report.status)
}

/// Match `facts` against `modes` and narrate the best match.
///
/// With `all` unset only the top match is kept in the report.
pub fn build_report<'a>(
    facts: &FactSnapshot,
    modes: &'a [FailureMode],
    narrator: &Narrator,
    all: bool,
) -> ExplainReport<'a> {
    let mut matches = match_modes(facts, modes);
    let explanation = matches.first().map(|top| narrator.explain(top.mode, facts));

    let status = if matches.is_empty() {
        ReportStatus::Healthy
    } else {
        ReportStatus::FailureDetected
    };

    if !all {
        matches.truncate(1);
    }

    ExplainReport {
        resource: facts.identifier(),
        kind: facts.kind(),
        status,
        matches,
        explanation,
    }
}

fn snapshot_facts(options: &ExplainOptions, path: &std::path::Path) -> Result<FactSnapshot> {
    let facts = load_snapshot(path)?;

    if facts.kind() != options.kind {
        return Err(KubeWhyError::InvalidArgument(format!(
            "{} holds a {} snapshot, but a {} was requested",
            path.display(),
            facts.kind(),
            options.kind
        )));
    }
    if facts.meta().name != options.name {
        log::warn!(
            "Snapshot {} describes '{}', not '{}'",
            path.display(),
            facts.meta().name,
            options.name
        );
    }

    Ok(facts)
}

async fn live_facts(
    options: &ExplainOptions,
    namespace: &str,
    config: &Config,
) -> Result<FactSnapshot> {
    // Install rustls crypto provider (required for TLS connections to K8s API)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let gather_options = config.cluster.gather_options();
    let context = options.context.as_ref().or(config.cluster.context.as_ref());

    let gatherer = match context {
        Some(context) => {
            log::info!("Using kubeconfig context {}", context);
            FactGatherer::with_context(context, gather_options).await?
        }
        None => {
            if let Ok(current) = FactGatherer::current_context() {
                log::info!("Using current kubeconfig context {}", current);
            }
            FactGatherer::new(gather_options).await?
        }
    };

    match gatherer.gather(options.kind, &options.name, namespace).await {
        Ok(facts) => Ok(facts),
        Err(e @ GatherError::NotFound(_)) => {
            eprintln!(
                "Tip: Check if the {} '{}' exists in namespace '{}'.",
                options.kind, options.name, namespace
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
