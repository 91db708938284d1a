//! Generative text service configuration.

use serde::{Deserialize, Serialize};

/// Settings for the OpenAI-compatible chat completion API.
///
/// A missing `api_key` is not an error: summarization runs in degraded
/// mode and returns a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// API key; `None` or empty disables remote calls.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the API, without the `/chat/completions` suffix.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Input text budget in characters.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,
    /// Completion token budget.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Number of bullets requested in a summary.
    #[serde(default = "default_summary_bullets")]
    pub summary_bullets: u32,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl AiConfig {
    /// Returns the API key if one is configured and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            model: default_model(),
            max_text_length: default_max_text_length(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            summary_bullets: default_summary_bullets(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_text_length() -> usize {
    15_000
}

fn default_max_output_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.3
}

fn default_summary_bullets() -> u32 {
    5
}

fn default_request_timeout() -> u64 {
    60
}
