//! Test Fixtures Module
//!
//! Shared by the integration tests:
//! - Audio fixtures (programmatically generated)
//! - Stub collaborators for every external service
//! - Application state and router wiring

#![allow(dead_code)]

pub mod audio_fixtures;

pub use audio_fixtures::*;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use ddobaki_gateway::core::audio::{
    AudioNormalizer, NormalizationError, TempStore, TranscriptionPipeline,
};
use ddobaki_gateway::core::llm::{ChatCompletion, ChatRequest, LLMError};
use ddobaki_gateway::core::stt::{DecodingOptions, STTError, SpeechRecognizer};
use ddobaki_gateway::core::tts::{SpeechSynthesizer, SynthesizedAudio, TTSError};
use ddobaki_gateway::{AppState, ServerConfig, routes};

/// Fake MP3 payload returned by [`StubSynthesizer`]
pub const FAKE_MP3: &[u8] = b"ID3\x04\x00fake-mp3-frames";

/// Completion stub that records every request and answers from a script.
pub struct RecordingChat {
    reply: Result<String, LLMError>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl RecordingChat {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: LLMError) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(err),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn last_request(&self) -> Option<ChatRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatCompletion for RecordingChat {
    async fn complete(&self, request: ChatRequest) -> Result<String, LLMError> {
        self.requests.lock().unwrap().push(request);
        self.reply.clone()
    }

    fn model_name(&self) -> &str {
        "stub-chat"
    }
}

/// Synthesizer stub that records the text it was asked to speak.
#[derive(Default)]
pub struct StubSynthesizer {
    pub spoken: Mutex<Vec<String>>,
}

#[async_trait]
impl SpeechSynthesizer for StubSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<SynthesizedAudio, TTSError> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(SynthesizedAudio::mp3(FAKE_MP3))
    }
}

/// Normalizer stub that writes one second of canonical silence and records
/// the suffix of every source file it was handed.
#[derive(Default)]
pub struct SilenceNormalizer {
    pub sources: Mutex<Vec<PathBuf>>,
}

#[async_trait]
impl AudioNormalizer for SilenceNormalizer {
    async fn normalize(&self, source: &Path, destination: &Path) -> Result<(), NormalizationError> {
        self.sources.lock().unwrap().push(source.to_path_buf());
        write_wav(destination, &generate_silence(SECOND), 1, SAMPLE_RATE);
        Ok(())
    }
}

/// Recognizer stub with a fixed transcript.
pub struct StubRecognizer {
    pub transcript: Result<String, STTError>,
}

impl StubRecognizer {
    pub fn saying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            transcript: Ok(text.to_string()),
        })
    }
}

#[async_trait]
impl SpeechRecognizer for StubRecognizer {
    async fn transcribe(
        &self,
        wav_path: &Path,
        _options: &DecodingOptions,
    ) -> Result<String, STTError> {
        assert!(wav_path.exists(), "recognizer must see the normalized file");
        self.transcript.clone()
    }

    fn model_name(&self) -> &str {
        "stub-whisper"
    }
}

/// Minimal configuration for tests; no real services are contacted.
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::with_api_key("sk-test");
    config.tts_max_sentences = 3;
    config
}

/// Everything a router test needs to inspect after a request.
pub struct Harness {
    pub router: Router,
    pub chat: Arc<RecordingChat>,
    pub tts: Arc<StubSynthesizer>,
    pub normalizer: Arc<SilenceNormalizer>,
    pub scratch: tempfile::TempDir,
}

impl Harness {
    pub fn new(chat: Arc<RecordingChat>, recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self::with_upload_limit(chat, recognizer, 1024 * 1024)
    }

    pub fn with_upload_limit(
        chat: Arc<RecordingChat>,
        recognizer: Arc<dyn SpeechRecognizer>,
        max_upload_bytes: usize,
    ) -> Self {
        let scratch = tempfile::tempdir().expect("scratch dir");
        let tts = Arc::new(StubSynthesizer::default());
        let normalizer = Arc::new(SilenceNormalizer::default());

        let store = TempStore::new(scratch.path()).expect("temp store");
        let pipeline = TranscriptionPipeline::new(store, normalizer.clone(), recognizer)
            .with_max_upload_bytes(max_upload_bytes);

        let mut config = test_config();
        config.max_upload_bytes = max_upload_bytes;
        let body_limit = config.request_body_limit();

        let state = AppState::from_parts(config, chat.clone(), tts.clone(), pipeline);
        let router = routes::api::create_api_router(body_limit).with_state(state);

        Self {
            router,
            chat,
            tts,
            normalizer,
            scratch,
        }
    }

    /// Number of files left behind in the scratch directory.
    pub fn leftover_files(&self) -> usize {
        std::fs::read_dir(self.scratch.path())
            .expect("read scratch dir")
            .count()
    }
}

pub const BOUNDARY: &str = "ddobaki-test-boundary";

/// One part of a hand-built multipart body.
pub struct Part<'a> {
    pub name: &'a str,
    pub filename: Option<&'a str>,
    pub content_type: Option<&'a str>,
    pub data: &'a [u8],
}

/// Encode parts as `multipart/form-data` with [`BOUNDARY`].
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let mut disposition = format!("Content-Disposition: form-data; name=\"{}\"", part.name);
        if let Some(filename) = part.filename {
            disposition.push_str(&format!("; filename=\"{filename}\""));
        }
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"\r\n");
        if let Some(content_type) = part.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
