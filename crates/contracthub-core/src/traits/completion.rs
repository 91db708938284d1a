//! Generative text service trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Requested shape of the completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Free-form text.
    #[default]
    Text,
    /// A single JSON object.
    JsonObject,
}

/// One blocking completion call.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Fixed system instruction.
    pub system_prompt: String,
    /// User content, already truncated to the text budget.
    pub user_text: String,
    /// Completion token budget.
    pub max_output_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Response format.
    pub response_format: ResponseFormat,
}

/// A chat-completion style text generation backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Whether the provider has credentials and may be called.
    fn is_configured(&self) -> bool;

    /// Issue a single completion request.
    ///
    /// Returns `Ok(None)` when the service answered without any content.
    async fn complete(&self, request: &CompletionRequest) -> AppResult<Option<String>>;
}
