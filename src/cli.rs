use crate::analyzer::{OutputFormat, ResourceKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kube-why")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Explain why a Kubernetes pod or service is unhealthy")]
#[command(long_about = "Inspects a pod or service, its events, logs and endpoints, matches the observations against a catalog of known failure modes, and explains the most likely one with evidence, impact and next checks.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Explain what is wrong with a pod or service
    Explain {
        /// Resource type (pod, svc)
        #[arg(value_name = "TYPE", value_parser = parse_kind)]
        kind: ResourceKind,

        /// Resource name
        #[arg(value_name = "NAME")]
        name: String,

        /// Kubernetes namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Kubeconfig context to use
        #[arg(long)]
        context: Option<String>,

        /// Read facts from a snapshot file instead of the cluster
        #[arg(long, value_name = "FILE", conflicts_with = "context")]
        facts: Option<PathBuf>,

        /// Output format (table, json, yaml, summary)
        #[arg(short, long, value_parser = parse_format)]
        format: Option<OutputFormat>,

        /// Show every matching failure mode, not just the most likely one
        #[arg(long)]
        all: bool,

        /// Exit with status 1 when a failure mode is detected
        #[arg(long)]
        fail_on_match: bool,
    },

    /// List the failure modes kube-why knows about
    Modes {
        /// Only modes for this resource type (pod, svc)
        #[arg(long, value_parser = parse_kind)]
        kind: Option<ResourceKind>,
    },
}

fn parse_kind(s: &str) -> Result<ResourceKind, String> {
    ResourceKind::parse(s)
        .ok_or_else(|| format!("unsupported resource type '{}'; use 'pod' or 'svc'", s))
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(s)
        .ok_or_else(|| format!("unknown format '{}'; use table, json, yaml or summary", s))
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
