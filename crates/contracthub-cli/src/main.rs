//! ContractHub CLI
//!
//! Operator tooling: database migrations, development tokens, one-off
//! text extraction and summarization, and configuration inspection.

mod commands;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use commands::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    cli.execute().await?;
    Ok(())
}
