//! Contract summarization with a degraded mode.

use std::borrow::Cow;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use contracthub_core::config::AiConfig;
use contracthub_core::error::AppError;
use contracthub_core::traits::{CompletionProvider, CompletionRequest, ResponseFormat};

use crate::metadata::{ContractMetadata, METADATA_PROMPT};

/// Appended to input text cut at the length budget.
pub const TRUNCATION_MARKER: &str = "... [text truncated due to length]";

/// Why a summary could not be produced. Each outcome has a fixed
/// user-facing placeholder, which is also its `Display` text.
#[derive(Debug, Error)]
pub enum Degraded {
    /// No API key is configured; no request was made.
    #[error("API key not configured. Summary not available.")]
    NotConfigured,
    /// The completion call failed.
    #[error("Error generating summary. Please try again later.")]
    RequestFailed(#[source] AppError),
    /// The service answered without content.
    #[error("Summary generation failed.")]
    EmptyResponse,
}

impl Degraded {
    /// Placeholder text stored in place of a summary.
    pub fn placeholder(&self) -> String {
        self.to_string()
    }
}

/// Cut `text` to at most `max_chars` characters, appending
/// [`TRUNCATION_MARKER`] when anything was removed.
pub fn truncate_text(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{TRUNCATION_MARKER}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

/// Produces bullet summaries and metadata for contract text.
#[derive(Debug, Clone)]
pub struct Summarizer {
    provider: Arc<dyn CompletionProvider>,
    max_text_length: usize,
    max_output_tokens: u32,
    temperature: f32,
    bullets: u32,
}

impl Summarizer {
    /// Creates a summarizer over `provider` using budgets from `config`.
    pub fn new(provider: Arc<dyn CompletionProvider>, config: &AiConfig) -> Self {
        Self {
            provider,
            max_text_length: config.max_text_length,
            max_output_tokens: config.max_output_tokens,
            temperature: config.temperature,
            bullets: config.summary_bullets,
        }
    }

    fn summary_prompt(&self) -> String {
        format!(
            "You are a legal assistant that summarizes contracts. Provide a concise {}-bullet \
             summary of the key points in the contract.",
            self.bullets
        )
    }

    fn request(&self, system_prompt: String, text: &str, format: ResponseFormat) -> CompletionRequest {
        CompletionRequest {
            system_prompt,
            user_text: truncate_text(text, self.max_text_length).into_owned(),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
            response_format: format,
        }
    }

    /// Summarize `text` with a single completion call.
    pub async fn summarize(&self, text: &str) -> Result<String, Degraded> {
        if !self.provider.is_configured() {
            return Err(Degraded::NotConfigured);
        }

        let request = self.request(self.summary_prompt(), text, ResponseFormat::Text);
        match self.provider.complete(&request).await {
            Ok(Some(summary)) => {
                info!(chars = summary.len(), "Generated summary");
                Ok(summary)
            }
            Ok(None) => Err(Degraded::EmptyResponse),
            Err(e) => Err(Degraded::RequestFailed(e)),
        }
    }

    /// Summarize `text`, substituting the placeholder on any degraded
    /// outcome.
    pub async fn summarize_or_placeholder(&self, text: &str) -> String {
        self.summarize(text).await.unwrap_or_else(|degraded| {
            match &degraded {
                Degraded::RequestFailed(cause) => {
                    warn!(error = %cause, "Summary generation failed; storing placeholder")
                }
                other => warn!(reason = ?other, "Summary unavailable; storing placeholder"),
            }
            degraded.placeholder()
        })
    }

    /// Ask the model for effective date, expiry date, parties, and type.
    ///
    /// Failures are reported through [`ContractMetadata::error`].
    pub async fn extract_metadata(&self, text: &str) -> ContractMetadata {
        if !self.provider.is_configured() {
            return ContractMetadata::failed("API key not configured.");
        }

        let request = self.request(METADATA_PROMPT.to_string(), text, ResponseFormat::JsonObject);
        let content = match self.provider.complete(&request).await {
            Ok(content) => content.unwrap_or_else(|| "{}".to_string()),
            Err(e) => {
                warn!(error = %e, "Metadata extraction failed");
                return ContractMetadata::failed("Error extracting metadata.");
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!(error = %e, "Metadata response was not valid JSON");
            ContractMetadata::failed("Error extracting metadata.")
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Mutex;

    use contracthub_core::result::AppResult;

    use super::*;

    #[derive(Debug, Default)]
    struct FakeProvider {
        configured: bool,
        reply: Option<Result<Option<String>, String>>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl FakeProvider {
        fn replying(reply: Result<Option<&str>, &str>) -> Self {
            Self {
                configured: true,
                reply: Some(reply.map(|r| r.map(str::to_string)).map_err(str::to_string)),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionProvider for FakeProvider {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn complete(&self, request: &CompletionRequest) -> AppResult<Option<String>> {
            self.seen.lock().unwrap().push(request.clone());
            match self.reply.clone().expect("unexpected call") {
                Ok(content) => Ok(content),
                Err(message) => Err(AppError::external_service(message)),
            }
        }
    }

    fn summarizer(provider: Arc<FakeProvider>) -> Summarizer {
        let config = AiConfig {
            max_text_length: 10,
            ..Default::default()
        };
        Summarizer::new(provider, &config)
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
        assert_eq!(
            truncate_text("héllo wörld", 5),
            format!("héllo{TRUNCATION_MARKER}")
        );
    }

    #[tokio::test]
    async fn test_summary_request_shape() {
        let provider = Arc::new(FakeProvider::replying(Ok(Some("- point one"))));
        let summary = summarizer(provider.clone())
            .summarize("This Agreement is made between Acme and Globex")
            .await
            .unwrap();
        assert_eq!(summary, "- point one");

        let seen = provider.seen.lock().unwrap();
        assert_eq!(
            seen[0].system_prompt,
            "You are a legal assistant that summarizes contracts. Provide a concise 5-bullet \
             summary of the key points in the contract."
        );
        assert_eq!(seen[0].user_text, format!("This Agree{TRUNCATION_MARKER}"));
        assert_eq!(seen[0].max_output_tokens, 500);
        assert_eq!(seen[0].response_format, ResponseFormat::Text);
    }

    #[tokio::test]
    async fn test_not_configured_makes_no_call() {
        let provider = Arc::new(FakeProvider::default());
        let summarizer = summarizer(provider.clone());

        assert_eq!(
            summarizer.summarize_or_placeholder("text").await,
            "API key not configured. Summary not available."
        );
        assert_eq!(
            summarizer.extract_metadata("text").await.error.as_deref(),
            Some("API key not configured.")
        );
        assert!(provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_placeholders() {
        let failing = summarizer(Arc::new(FakeProvider::replying(Err("boom"))));
        assert_eq!(
            failing.summarize_or_placeholder("text").await,
            "Error generating summary. Please try again later."
        );
        assert_eq!(
            failing.extract_metadata("text").await.error.as_deref(),
            Some("Error extracting metadata.")
        );

        let empty = summarizer(Arc::new(FakeProvider::replying(Ok(None))));
        assert!(matches!(empty.summarize("text").await, Err(Degraded::EmptyResponse)));
        assert_eq!(
            empty.summarize_or_placeholder("text").await,
            "Summary generation failed."
        );
    }

    #[tokio::test]
    async fn test_metadata_parsed_from_json() {
        let provider = Arc::new(FakeProvider::replying(Ok(Some(
            r#"{"effectiveDate":"2024-03-01","parties":["Acme","Globex"],"contractType":"NDA"}"#,
        ))));
        let metadata = summarizer(provider.clone()).extract_metadata("text").await;

        assert_eq!(metadata.effective_date.as_deref(), Some("2024-03-01"));
        assert_eq!(metadata.parties, vec!["Acme", "Globex"]);
        assert_eq!(metadata.contract_type.as_deref(), Some("NDA"));
        assert!(metadata.error.is_none());
        assert_eq!(
            provider.seen.lock().unwrap()[0].response_format,
            ResponseFormat::JsonObject
        );
    }

    #[tokio::test]
    async fn test_metadata_empty_reply_is_empty_object() {
        let provider = Arc::new(FakeProvider::replying(Ok(None)));
        let metadata = summarizer(provider).extract_metadata("text").await;
        assert_eq!(metadata, ContractMetadata::default());
    }

    #[tokio::test]
    async fn test_metadata_invalid_json() {
        let provider = Arc::new(FakeProvider::replying(Ok(Some("not json"))));
        let metadata = summarizer(provider).extract_metadata("text").await;
        assert_eq!(metadata.error.as_deref(), Some("Error extracting metadata."));
    }
}
