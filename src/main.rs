use clap::Parser;
use kube_why::{
    analyzer::ReportStatus,
    cli::{Cli, Commands},
    config,
    handlers::{ExplainOptions, handle_explain, handle_modes},
};
use std::process;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

async fn run() -> kube_why::Result<i32> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Explain {
            kind,
            name,
            namespace,
            context,
            facts,
            format,
            all,
            fail_on_match,
        } => {
            let options = ExplainOptions {
                kind,
                name,
                namespace,
                context,
                facts,
                format,
                all,
            };
            let status = handle_explain(options, &config).await?;
            Ok(if fail_on_match && status == ReportStatus::FailureDetected {
                1
            } else {
                0
            })
        }
        Commands::Modes { kind } => {
            handle_modes(kind, &config)?;
            Ok(0)
        }
    }
}
