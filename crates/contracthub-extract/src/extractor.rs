//! HTTP-backed [`TextExtractor`] implementation.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::fs;
use tracing::{info, warn};

use contracthub_core::config::ExtractionConfig;
use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;
use contracthub_core::traits::{ExtractedText, FileFormat, TextExtractor};

use crate::clean::clean_text;
use crate::docx::extract_docx;
use crate::download::download_to_temp;
use crate::format::{declared_format, detect_format};
use crate::pdf::extract_pdf;

/// Downloads contract files over HTTP(S) and extracts their text.
#[derive(Debug, Clone)]
pub struct HttpTextExtractor {
    client: Client,
    temp_dir: PathBuf,
    max_download_bytes: u64,
}

impl HttpTextExtractor {
    /// Creates an extractor from extraction configuration.
    pub fn new(config: &ExtractionConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.download_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            temp_dir: config.temp_dir(),
            max_download_bytes: config.max_download_bytes,
        })
    }
}

/// Parse a downloaded file. Runs on a blocking thread.
fn parse(format: FileFormat, data: &[u8]) -> AppResult<String> {
    match format {
        FileFormat::Pdf => extract_pdf(data),
        FileFormat::Docx => extract_docx(data),
        FileFormat::Doc => Err(unsupported_doc()),
    }
}

fn unsupported_doc() -> AppError {
    AppError::unsupported_format("Legacy .doc files are not supported; upload a PDF or DOCX")
}

#[async_trait]
impl TextExtractor for HttpTextExtractor {
    async fn extract(
        &self,
        file_url: &str,
        declared_type: Option<&str>,
    ) -> AppResult<ExtractedText> {
        let format = detect_format(file_url)?;

        if let Some(declared) = declared_type.and_then(declared_format) {
            if declared != format {
                warn!(
                    detected = %format,
                    declared = %declared,
                    "Declared file type does not match the file URL"
                );
            }
        }
        if format == FileFormat::Doc {
            return Err(unsupported_doc());
        }

        let temp = download_to_temp(
            &self.client,
            file_url,
            &self.temp_dir,
            format.as_str(),
            self.max_download_bytes,
        )
        .await?;
        let data = fs::read(temp.path()).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read downloaded file", e)
        })?;
        drop(temp);

        let raw = tokio::task::spawn_blocking(move || parse(format, &data))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Extraction task failed", e))??;

        let text = clean_text(&raw);
        info!(file_type = %format, chars = text.len(), "Extracted text");
        Ok(ExtractedText {
            text,
            file_type: format,
        })
    }
}
