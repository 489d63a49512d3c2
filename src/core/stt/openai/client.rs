//! Whisper-compatible recognizer.
//!
//! The canonical WAV produced by the normalizer is uploaded as a multipart form
//! together with the decoding options. The task is always `transcriptions`
//! (never `translations`), and each call is independent: no previously
//! recognized text is sent as context.

use std::path::Path;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use super::config::WhisperConfig;
use super::messages::TranscriptionResponse;
use crate::core::providers::openai::{build_http_client, describe_error};
use crate::core::stt::base::{DecodingOptions, STTError, SpeechRecognizer};

/// A loaded Whisper-compatible recognition model.
///
/// Cheap to share behind an `Arc`; the inner HTTP client pools connections.
pub struct WhisperRecognizer {
    config: WhisperConfig,
    http_client: Client,
}

impl std::fmt::Debug for WhisperRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperRecognizer")
            .field("api_url", &self.config.api_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl WhisperRecognizer {
    /// Validate the configuration and prepare the model handle.
    ///
    /// Called once at startup; a failure here is fatal to the service.
    pub fn load(config: WhisperConfig) -> Result<Self, STTError> {
        config.validate().map_err(STTError::ConfigurationError)?;

        let http_client = build_http_client(config.timeout).map_err(|e| {
            STTError::ConfigurationError(format!("Failed to create HTTP client: {e}"))
        })?;

        info!(
            model = %config.model,
            endpoint = %config.api_url,
            "Speech recognition model loaded"
        );

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Assemble the multipart body for one recognition call.
    fn build_form(&self, wav: Vec<u8>, options: &DecodingOptions) -> Result<Form, STTError> {
        let file_part = Part::bytes(wav)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| STTError::ConfigurationError(format!("Invalid MIME type: {e}")))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone())
            .text("response_format", "json")
            .text("temperature", options.temperature.to_string());

        if let Some(ref language) = options.language {
            form = form.text("language", language.clone());
        }
        if let Some(ref prompt) = options.prompt {
            form = form.text("prompt", prompt.clone());
        }
        if let Some(beam_size) = options.beam_size {
            form = form.text("beam_size", beam_size.to_string());
        }
        if let Some(best_of) = options.best_of {
            form = form.text("best_of", best_of.to_string());
        }

        Ok(form)
    }
}

#[async_trait]
impl SpeechRecognizer for WhisperRecognizer {
    async fn transcribe(
        &self,
        wav_path: &Path,
        options: &DecodingOptions,
    ) -> Result<String, STTError> {
        let wav = tokio::fs::read(wav_path).await.map_err(|e| {
            STTError::AudioProcessingError(format!(
                "Failed to read {}: {e}",
                wav_path.display()
            ))
        })?;

        debug!(bytes = wav.len(), model = %self.config.model, "Sending audio for recognition");

        let form = self.build_form(wav, options)?;

        let mut request = self.http_client.post(&self.config.api_url).multipart(form);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| STTError::NetworkError(format!("Request failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| STTError::NetworkError(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            let message = describe_error(status, &body);
            warn!(status = status.as_u16(), "Recognition request rejected: {}", message);
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    STTError::AuthenticationFailed(message)
                }
                _ => STTError::ProviderError(message),
            });
        }

        let parsed: TranscriptionResponse = serde_json::from_str(&body).map_err(|e| {
            STTError::ProviderError(format!("Failed to parse transcription response: {e}"))
        })?;

        Ok(parsed.into_text())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
