use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::ServerConfig;

/// Vocabulary hint biasing recognition toward the elder-care domain
/// (diary, mood, hospital visits, aches, plans).
pub const DEFAULT_VOCABULARY_HINT: &str = "일기, 감정, 병원, 통증, 무릎, 허리, 아프다, 기분, 상태, 오늘, 괜찮다, 방문, 갈 예정이다., 예정, 계획";

/// STT-specific error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum STTError {
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Audio processing error: {0}")]
    AudioProcessingError(String),
}

/// Decoding knobs honored on every recognition call.
///
/// The task is always plain transcription (never translation), and no text
/// from earlier requests is fed back as context; both are fixed by the
/// recognizer rather than exposed here.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodingOptions {
    /// Pinned recognition language (ISO-639-1). `None` lets the model detect it.
    pub language: Option<String>,
    /// Sampling temperature; 0.0 is fully deterministic
    pub temperature: f32,
    /// Beam-search width
    pub beam_size: Option<u32>,
    /// Number of candidates retained when sampling
    pub best_of: Option<u32>,
    /// Optional domain vocabulary hint
    pub prompt: Option<String>,
}

impl Default for DecodingOptions {
    fn default() -> Self {
        Self {
            language: Some("ko".to_string()),
            temperature: 0.0,
            beam_size: Some(5),
            best_of: Some(5),
            prompt: Some(DEFAULT_VOCABULARY_HINT.to_string()),
        }
    }
}

impl DecodingOptions {
    /// Build decoding options from server configuration.
    ///
    /// Zero beam/best-of values and empty strings mean "leave it to the server".
    /// Beam search is only requested from self-hosted servers (`stt_api_url`
    /// set); the hosted OpenAI endpoint rejects those fields.
    pub fn from_config(config: &ServerConfig) -> Self {
        let non_empty = |s: &str| Some(s.trim().to_string()).filter(|s| !s.is_empty());
        let self_hosted = config.stt_api_url.is_some();
        let search = |n: u32| Some(n).filter(|&n| self_hosted && n > 0);
        Self {
            language: non_empty(&config.stt_language),
            temperature: config.stt_temperature,
            beam_size: search(config.stt_beam_size),
            best_of: search(config.stt_best_of),
            prompt: config.stt_prompt.as_deref().and_then(non_empty),
        }
    }
}

/// A pre-loaded speech recognition model.
///
/// One instance is created at startup and shared read-only across requests;
/// the handle is injected into the transcription pipeline so tests can
/// substitute a stub.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    /// Recognize speech in a canonical (mono, 16 kHz, PCM) WAV file.
    ///
    /// Returns the raw recognized text. An empty string is a valid result for
    /// clips without speech.
    async fn transcribe(
        &self,
        wav_path: &Path,
        options: &DecodingOptions,
    ) -> Result<String, STTError>;

    /// Name of the loaded model preset.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_favor_accuracy() {
        let options = DecodingOptions::default();
        assert_eq!(options.language.as_deref(), Some("ko"));
        assert_eq!(options.temperature, 0.0);
        assert_eq!(options.beam_size, Some(5));
        assert_eq!(options.best_of, Some(5));
        assert!(options.prompt.as_deref().unwrap().contains("병원"));
    }

    #[test]
    fn test_options_from_config() {
        let mut config = ServerConfig::with_api_key("sk-test");
        config.stt_api_url = Some("http://whisper:8080/v1/audio/transcriptions".to_string());
        config.stt_beam_size = 0;
        config.stt_best_of = 3;
        config.stt_language = " ".to_string();
        config.stt_prompt = Some("무릎, 허리".to_string());

        let options = DecodingOptions::from_config(&config);
        assert_eq!(options.beam_size, None);
        assert_eq!(options.best_of, Some(3));
        assert_eq!(options.language, None);
        assert_eq!(options.prompt.as_deref(), Some("무릎, 허리"));
    }

    #[test]
    fn test_hosted_endpoint_omits_beam_search() {
        let config = ServerConfig::with_api_key("sk-test");
        assert_eq!(config.stt_beam_size, 5);

        let options = DecodingOptions::from_config(&config);
        assert_eq!(options.beam_size, None);
        assert_eq!(options.best_of, None);
        assert_eq!(options.language.as_deref(), Some("ko"));
        assert_eq!(options.temperature, 0.0);
    }

    #[test]
    fn test_self_hosted_endpoint_keeps_beam_search() {
        let mut config = ServerConfig::with_api_key("sk-test");
        config.stt_api_url = Some("http://whisper:8080/v1/audio/transcriptions".to_string());

        let options = DecodingOptions::from_config(&config);
        assert_eq!(options.beam_size, Some(5));
        assert_eq!(options.best_of, Some(5));
    }

    #[test]
    fn test_error_display() {
        let err = STTError::ProviderError("decoder fault".to_string());
        assert_eq!(err.to_string(), "Provider error: decoder fault");
    }
}
