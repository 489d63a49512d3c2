use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::config::ServerConfig;
use crate::core::audio::TranscriptionPipeline;
use crate::core::llm::{ChatCompletion, OpenAIChat, OpenAIChatConfig};
use crate::core::stt::{SpeechRecognizer, WhisperConfig, WhisperRecognizer};
use crate::core::tts::{OpenAITTS, OpenAITTSConfig, SpeechSynthesizer};

/// Shared application state.
///
/// Every external collaborator sits behind a trait object so tests can swap
/// in stubs through [`AppState::from_parts`].
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub chat: Arc<dyn ChatCompletion>,
    pub tts: Arc<dyn SpeechSynthesizer>,
    pub pipeline: Arc<TranscriptionPipeline>,
}

impl AppState {
    /// Build the production state. The recognition model is loaded here, once.
    pub fn new(config: ServerConfig) -> anyhow::Result<Arc<Self>> {
        let chat = OpenAIChat::new(OpenAIChatConfig::from_server_config(&config))
            .context("failed to create chat client")?;

        let tts_config = OpenAITTSConfig::from_server_config(&config)
            .context("invalid speech synthesis settings")?;
        let tts = OpenAITTS::new(tts_config).context("failed to create speech client")?;

        let recognizer: Arc<dyn SpeechRecognizer> = Arc::new(
            WhisperRecognizer::load(WhisperConfig::from_server_config(&config))
                .context("failed to load speech recognition model")?,
        );
        let pipeline = TranscriptionPipeline::from_config(&config, recognizer)
            .context("failed to prepare audio scratch directory")?;

        info!(
            chat_model = chat.model_name(),
            stt_model = pipeline.model_name(),
            max_concurrent_transcriptions = config.max_concurrent_transcriptions,
            "Application state initialized"
        );

        Ok(Self::from_parts(
            config,
            Arc::new(chat),
            Arc::new(tts),
            pipeline,
        ))
    }

    pub fn from_parts(
        config: ServerConfig,
        chat: Arc<dyn ChatCompletion>,
        tts: Arc<dyn SpeechSynthesizer>,
        pipeline: TranscriptionPipeline,
    ) -> Arc<Self> {
        Arc::new(Self {
            config: Arc::new(config),
            chat,
            tts,
            pipeline: Arc::new(pipeline),
        })
    }
}
