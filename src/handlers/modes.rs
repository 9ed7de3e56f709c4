//! Handler for the `modes` command.

use crate::analyzer::{Catalog, FailureMode, ResourceKind, builtin_catalog};
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;

pub fn handle_modes(kind: Option<ResourceKind>, config: &Config) -> Result<()> {
    if !config.output.color {
        colored::control::set_override(false);
    }
    print!("{}", format_modes(builtin_catalog(), kind, &config.matching.ignore_modes));
    Ok(())
}

/// Render the catalog as a tree, marking ignored modes.
pub fn format_modes(catalog: &Catalog, kind: Option<ResourceKind>, ignored: &[String]) -> String {
    let modes: Vec<&FailureMode> = catalog
        .modes()
        .iter()
        .filter(|mode| kind.is_none_or(|k| mode.applies_to == k))
        .collect();

    let mut output = format!("🩺 Known failure modes ({}):\n", modes.len());

    for (i, mode) in modes.iter().enumerate() {
        let branch = if i + 1 == modes.len() { "└──" } else { "├──" };
        let is_ignored = ignored.iter().any(|id| id == mode.id.as_str());

        output.push_str(&format!(
            "{} {} {} {}{}\n",
            branch,
            mode.name.bright_white().bold(),
            format!("[{}]", mode.id).bright_cyan(),
            format!("({})", mode.applies_to).dimmed(),
            if is_ignored {
                format!(" {}", "ignored".yellow())
            } else {
                String::new()
            }
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_every_builtin() {
        colored::control::set_override(false);
        let output = format_modes(builtin_catalog(), None, &[]);
        assert!(output.contains("Known failure modes (4)"));
        assert!(output.contains("CrashLoopBackOff [crash-loop-back-off] (pod)"));
        assert!(output.contains("└── ServiceNoEndpoints [service-no-endpoints] (service)"));
    }

    #[test]
    fn test_filters_by_kind_and_marks_ignored() {
        colored::control::set_override(false);
        let output = format_modes(
            builtin_catalog(),
            Some(ResourceKind::Pod),
            &["oom-killed".to_string()],
        );
        assert!(output.contains("Known failure modes (3)"));
        assert!(!output.contains("ServiceNoEndpoints"));
        assert!(output.contains("[oom-killed] (pod) ignored"));
    }
}
