//! OpenAI speech synthesis.
//!
//! - Endpoint: `POST {base_url}/audio/speech`
//! - Output: MP3, returned whole

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, warn};

use super::config::OpenAITTSConfig;
use crate::core::providers::openai::{build_http_client, describe_error};
use crate::core::tts::base::{SpeechSynthesizer, SynthesizedAudio, TTSError};

pub struct OpenAITTS {
    config: OpenAITTSConfig,
    http_client: Client,
}

impl std::fmt::Debug for OpenAITTS {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAITTS")
            .field("model", &self.config.model)
            .field("voice", &self.config.voice)
            .finish()
    }
}

impl OpenAITTS {
    pub fn new(config: OpenAITTSConfig) -> Result<Self, TTSError> {
        config.validate()?;
        let http_client = build_http_client(config.timeout).map_err(|e| {
            TTSError::InvalidConfiguration(format!("Failed to create HTTP client: {e}"))
        })?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn request_body(&self, text: &str) -> serde_json::Value {
        let mut body = json!({
            "model": self.config.model.as_str(),
            "input": text,
            "voice": self.config.voice.as_str(),
            "response_format": "mp3",
        });
        if (self.config.speed - 1.0).abs() > 0.001 {
            body["speed"] = json!(self.config.speed);
        }
        body
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAITTS {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, TTSError> {
        if text.trim().is_empty() {
            return Err(TTSError::InvalidInput("Text is empty".to_string()));
        }

        debug!(
            chars = text.chars().count(),
            voice = self.config.voice.as_str(),
            "Requesting speech synthesis"
        );

        let response = self
            .http_client
            .post(self.config.api_url())
            .bearer_auth(&self.config.api_key)
            .json(&self.request_body(text))
            .send()
            .await
            .map_err(|e| TTSError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = describe_error(status, &body);
            warn!(status = status.as_u16(), "Speech synthesis rejected: {}", message);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    TTSError::AuthenticationFailed(message)
                }
                _ => TTSError::ProviderError(message),
            });
        }

        let data: Bytes = response
            .bytes()
            .await
            .map_err(|e| TTSError::NetworkError(format!("Failed to read audio: {e}")))?;
        if data.is_empty() {
            return Err(TTSError::ProviderError(
                "Speech service returned no audio".to_string(),
            ));
        }

        debug!(bytes = data.len(), "Speech synthesized");
        Ok(SynthesizedAudio::mp3(data))
    }
}
