use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use super::config::OpenAIChatConfig;
use super::messages::{ChatCompletionRequest, ChatCompletionResponse};
use crate::core::llm::base::{ChatCompletion, ChatRequest, LLMError};
use crate::core::providers::openai::{build_http_client, describe_error};

/// Chat client for OpenAI-compatible completion APIs.
pub struct OpenAIChat {
    config: OpenAIChatConfig,
    http_client: Client,
}

impl std::fmt::Debug for OpenAIChat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIChat")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAIChat {
    pub fn new(config: OpenAIChatConfig) -> Result<Self, LLMError> {
        if config.api_key.trim().is_empty() {
            return Err(LLMError::ConfigurationError(
                "API key is required".to_string(),
            ));
        }
        let http_client = build_http_client(config.timeout).map_err(|e| {
            LLMError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
        })?;
        Ok(Self {
            config,
            http_client,
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenAIChat {
    async fn complete(&self, request: ChatRequest) -> Result<String, LLMError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            max_tokens: request.max_tokens,
        };

        debug!(
            model = %self.config.model,
            max_tokens = request.max_tokens,
            "Requesting chat completion"
        );

        let response = self
            .http_client
            .post(self.config.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LLMError::NetworkError(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = describe_error(status, &text);
            warn!(status = status.as_u16(), "Chat completion rejected: {}", message);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    LLMError::AuthenticationFailed(message)
                }
                _ => LLMError::ProviderError(message),
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| LLMError::InvalidResponse(format!("Malformed completion: {e}")))?;

        parsed
            .into_content()
            .map(|content| content.trim().to_string())
            .ok_or_else(|| LLMError::InvalidResponse("Completion has no content".to_string()))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
