//! One-off text extraction from a contract URL.

use clap::Args;
use serde::Serialize;

use contracthub_core::config::AppConfig;
use contracthub_core::error::AppError;
use contracthub_core::traits::{FileFormat, TextExtractor};
use contracthub_extract::HttpTextExtractor;

use crate::output::{self, OutputFormat};

/// Arguments for the extract command
#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// URL of a PDF or DOCX file
    pub url: String,

    /// Declared MIME type, e.g. `application/pdf`
    #[arg(long = "type")]
    pub file_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExtractOutput {
    text: String,
    file_type: FileFormat,
    token_count: usize,
}

/// Download the file and print its normalized text.
pub async fn execute(
    args: &ExtractArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let extractor = HttpTextExtractor::new(&config.extraction)?;
    let extracted = extractor
        .extract(&args.url, args.file_type.as_deref())
        .await?;
    let token_count = extracted.token_count();

    match format {
        OutputFormat::Table => {
            println!("{}", extracted.text);
            output::print_success(&format!(
                "Extracted {token_count} words from {}",
                extracted.file_type
            ));
        }
        OutputFormat::Json => output::print_json(&ExtractOutput {
            text: extracted.text,
            file_type: extracted.file_type,
            token_count,
        }),
    }
    Ok(())
}
