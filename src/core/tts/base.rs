use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// TTS-specific error types
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TTSError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Provider error: {0}")]
    ProviderError(String),
}

/// A complete encoded clip.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedAudio {
    pub data: Bytes,
    /// MIME type of `data`
    pub content_type: &'static str,
}

impl SynthesizedAudio {
    pub fn mp3(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            content_type: "audio/mpeg",
        }
    }
}

/// Turns text into an encoded audio clip in one request.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, TTSError>;
}
