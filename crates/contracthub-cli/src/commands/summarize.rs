//! Summarize or extract metadata from a local text file.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;

use contracthub_ai::{OpenAiClient, Summarizer};
use contracthub_core::config::AppConfig;
use contracthub_core::error::{AppError, ErrorKind};

use crate::output::{self, KeyValue, OutputFormat};

/// Arguments for the summarize command
#[derive(Debug, Args)]
pub struct SummarizeArgs {
    /// Plain-text file holding the contract text
    pub file: PathBuf,

    /// Extract effective date, expiry date, parties and type instead
    #[arg(long)]
    pub metadata: bool,
}

/// Run the summarizer over the file contents.
pub async fn execute(
    args: &SummarizeArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let text = tokio::fs::read_to_string(&args.file).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Validation,
            format!("Failed to read {}", args.file.display()),
            e,
        )
    })?;
    tracing::debug!(file = %args.file.display(), chars = text.len(), "Read input text");

    if config.ai.api_key().is_none() {
        output::print_warning("No AI API key configured; output will be a placeholder.");
    }

    let client = Arc::new(OpenAiClient::new(&config.ai)?);
    let summarizer = Summarizer::new(client, &config.ai);

    if args.metadata {
        let metadata = summarizer.extract_metadata(&text).await;
        match format {
            OutputFormat::Json => output::print_json(&metadata),
            OutputFormat::Table => {
                let rows = [
                    KeyValue::new("Effective date", opt(&metadata.effective_date)),
                    KeyValue::new("Expiry date", opt(&metadata.expiry_date)),
                    KeyValue::new("Parties", metadata.parties.join(", ")),
                    KeyValue::new("Contract type", opt(&metadata.contract_type)),
                    KeyValue::new("Error", opt(&metadata.error)),
                ];
                output::print_list(&rows, format);
            }
        }
        return Ok(());
    }

    let summary = summarizer.summarize_or_placeholder(&text).await;
    match format {
        OutputFormat::Table => println!("{summary}"),
        OutputFormat::Json => output::print_json(&serde_json::json!({ "summary": summary })),
    }
    Ok(())
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}
