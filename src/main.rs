//! Tabular Trainer - Main Entry Point

use clap::Parser;
use tabular_trainer::cli::{cmd_run, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabular_trainer=info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cmd_run(&cli) {
        // Stage failures are already logged by the pipeline
        if e.stage().is_none() {
            tracing::error!(error = %e, "Training run aborted");
        }
        return Err(e.into());
    }

    Ok(())
}
