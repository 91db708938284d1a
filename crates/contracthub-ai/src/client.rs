//! OpenAI-compatible chat completion client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use contracthub_core::config::AiConfig;
use contracthub_core::error::{AppError, ErrorKind};
use contracthub_core::result::AppResult;
use contracthub_core::traits::{CompletionProvider, CompletionRequest, ResponseFormat};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormatBody>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormatBody {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Chat completion client. One request per call, no retries.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("configured", &self.api_key.is_some())
            .finish()
    }
}

impl OpenAiClient {
    /// Creates a client from AI configuration.
    pub fn new(config: &AiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            api_key: config.api_key().map(str::to_string),
        })
    }
}

#[async_trait]
impl CompletionProvider for OpenAiClient {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, request: &CompletionRequest) -> AppResult<Option<String>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::configuration("AI API key not configured"))?;

        let body = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_text,
                },
            ],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
            response_format: match request.response_format {
                ResponseFormat::Text => None,
                ResponseFormat::JsonObject => Some(ResponseFormatBody {
                    kind: "json_object",
                }),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "Completion request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(format!(
                "Completion API returned {}",
                status.as_u16()
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::ExternalService,
                "Invalid completion API response",
                e,
            )
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .filter(|c| !c.trim().is_empty());
        debug!(model = %self.model, empty = content.is_none(), "Completion received");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn request(format: ResponseFormat) -> CompletionRequest {
        CompletionRequest {
            system_prompt: "sys".into(),
            user_text: "contract text".into(),
            max_output_tokens: 500,
            temperature: 0.5,
            response_format: format,
        }
    }

    fn client(base_url: String) -> OpenAiClient {
        OpenAiClient::new(&AiConfig {
            api_key: Some("sk-test".into()),
            base_url,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_sends_chat_request() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1/chat/completions")
                    .header("authorization", "Bearer sk-test")
                    .json_body(json!({
                        "model": "gpt-3.5-turbo",
                        "messages": [
                            { "role": "system", "content": "sys" },
                            { "role": "user", "content": "contract text" }
                        ],
                        "max_tokens": 500,
                        "temperature": 0.5,
                        "response_format": { "type": "json_object" }
                    }));
                then.status(200).json_body(json!({
                    "choices": [{ "message": { "role": "assistant", "content": "{}" } }]
                }));
            })
            .await;

        let content = client(server.url("/v1"))
            .complete(&request(ResponseFormat::JsonObject))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(content.as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_empty_choices() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(200).json_body(json!({ "choices": [] }));
            })
            .await;

        let content = client(server.base_url())
            .complete(&request(ResponseFormat::Text))
            .await
            .unwrap();
        assert_eq!(content, None);
    }

    #[tokio::test]
    async fn test_error_status_is_external_service_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/chat/completions");
                then.status(429).json_body(json!({ "error": { "message": "rate limited" } }));
            })
            .await;

        let err = client(server.base_url())
            .complete(&request(ResponseFormat::Text))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::ExternalService));
    }

    #[test]
    fn test_blank_key_is_not_configured() {
        let client = OpenAiClient::new(&AiConfig {
            api_key: Some("  ".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(!client.is_configured());
    }
}
