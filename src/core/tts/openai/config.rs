//! Settings for the OpenAI speech endpoint.

use std::time::Duration;

use crate::config::{DEFAULT_OPENAI_BASE_URL, ServerConfig};
use crate::core::tts::base::TTSError;

/// Speech models accepted by `/audio/speech`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenAITTSModel {
    /// Lower latency
    #[default]
    Tts1,
    /// Higher fidelity
    Tts1Hd,
    Gpt4oMiniTts,
}

impl OpenAITTSModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tts1 => "tts-1",
            Self::Tts1Hd => "tts-1-hd",
            Self::Gpt4oMiniTts => "gpt-4o-mini-tts",
        }
    }

    pub fn parse(s: &str) -> Result<Self, TTSError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tts-1" => Ok(Self::Tts1),
            "tts-1-hd" => Ok(Self::Tts1Hd),
            "gpt-4o-mini-tts" => Ok(Self::Gpt4oMiniTts),
            other => Err(TTSError::InvalidConfiguration(format!(
                "Unknown TTS model: {other}"
            ))),
        }
    }
}

/// Voices offered by the speech endpoint. `Nova` reads Korean warmly and is
/// the default for the companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenAIVoice {
    Alloy,
    Ash,
    Coral,
    Echo,
    Fable,
    Onyx,
    #[default]
    Nova,
    Sage,
    Shimmer,
}

impl OpenAIVoice {
    const ALL: [OpenAIVoice; 9] = [
        Self::Alloy,
        Self::Ash,
        Self::Coral,
        Self::Echo,
        Self::Fable,
        Self::Onyx,
        Self::Nova,
        Self::Sage,
        Self::Shimmer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alloy => "alloy",
            Self::Ash => "ash",
            Self::Coral => "coral",
            Self::Echo => "echo",
            Self::Fable => "fable",
            Self::Onyx => "onyx",
            Self::Nova => "nova",
            Self::Sage => "sage",
            Self::Shimmer => "shimmer",
        }
    }

    pub fn parse(s: &str) -> Result<Self, TTSError> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| TTSError::InvalidConfiguration(format!("Unknown TTS voice: {s}")))
    }
}

#[derive(Debug, Clone)]
pub struct OpenAITTSConfig {
    pub api_key: String,
    /// Base URL without trailing slash
    pub base_url: String,
    pub model: OpenAITTSModel,
    pub voice: OpenAIVoice,
    /// Playback speed, 0.25 to 4.0
    pub speed: f32,
    pub timeout: Duration,
}

impl OpenAITTSConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: OpenAITTSModel::default(),
            voice: OpenAIVoice::default(),
            speed: 1.0,
            timeout: Duration::from_secs(60),
        }
    }

    pub fn from_server_config(config: &ServerConfig) -> Result<Self, TTSError> {
        Ok(Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: OpenAITTSModel::parse(&config.tts_model)?,
            voice: OpenAIVoice::parse(&config.tts_voice)?,
            speed: config.tts_speed,
            timeout: config.upstream_timeout(),
        })
    }

    pub fn api_url(&self) -> String {
        format!("{}/audio/speech", self.base_url)
    }

    pub fn validate(&self) -> Result<(), TTSError> {
        if self.api_key.trim().is_empty() {
            return Err(TTSError::InvalidConfiguration(
                "API key is required".to_string(),
            ));
        }
        if !(0.25..=4.0).contains(&self.speed) {
            return Err(TTSError::InvalidConfiguration(format!(
                "Speed must be between 0.25 and 4.0, got {}",
                self.speed
            )));
        }
        Ok(())
    }
}
