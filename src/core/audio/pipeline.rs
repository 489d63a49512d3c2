//! Upload → scratch file → canonical WAV → text.
//!
//! [`TranscriptionPipeline::transcribe_upload`] owns both temporary artifacts
//! for the whole run and removes them on every exit path before returning.
//! Normalization and recognition are gated by a semaphore so concurrent
//! requests queue instead of contending for the transcoder and the model.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures::Stream;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::content_type::resolve_suffix;
use super::normalizer::{AudioNormalizer, FfmpegNormalizer, NormalizationError, ensure_canonical};
use super::temp_store::{StorageError, TempArtifact, TempStore, WriteError};
use crate::config::ServerConfig;
use crate::core::stt::{DecodingOptions, STTError, SpeechRecognizer};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Normalization(#[from] NormalizationError),
    #[error("Transcription failed: {0}")]
    Transcription(#[from] STTError),
    #[error("Upload exceeds the {limit} byte limit")]
    UploadTooLarge { limit: usize },
    #[error("Upload is empty")]
    EmptyUpload,
    #[error("Failed to read upload: {0}")]
    Upload(String),
    #[error("Transcription capacity is unavailable")]
    Unavailable,
    #[error("Transcription timed out after {}s", .0.as_secs())]
    TimedOut(Duration),
}

impl From<WriteError> for PipelineError {
    fn from(err: WriteError) -> Self {
        match err {
            WriteError::Storage(e) => Self::Storage(e),
            WriteError::TooLarge { limit } => Self::UploadTooLarge { limit },
            WriteError::Source(msg) => Self::Upload(msg),
        }
    }
}

/// One file received from a client.
pub struct Upload<S> {
    /// Declared media type, if any
    pub media_type: Option<String>,
    /// Client-side filename, if any
    pub filename: Option<String>,
    /// File contents as they arrive
    pub body: S,
}

pub struct TranscriptionPipeline {
    store: TempStore,
    normalizer: Arc<dyn AudioNormalizer>,
    recognizer: Arc<dyn SpeechRecognizer>,
    options: DecodingOptions,
    permits: Semaphore,
    timeout: Duration,
    max_upload_bytes: usize,
}

impl TranscriptionPipeline {
    pub const DEFAULT_CONCURRENCY: usize = 2;
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(
        store: TempStore,
        normalizer: Arc<dyn AudioNormalizer>,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> Self {
        Self {
            store,
            normalizer,
            recognizer,
            options: DecodingOptions::default(),
            permits: Semaphore::new(Self::DEFAULT_CONCURRENCY),
            timeout: Self::DEFAULT_TIMEOUT,
            max_upload_bytes: crate::config::DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Wire the pipeline from configuration with an `ffmpeg` normalizer.
    pub fn from_config(
        config: &ServerConfig,
        recognizer: Arc<dyn SpeechRecognizer>,
    ) -> Result<Self, StorageError> {
        let store = TempStore::new(config.audio_temp_dir())?;
        let normalizer = Arc::new(FfmpegNormalizer::new(config.ffmpeg_path.clone()));
        Ok(Self::new(store, normalizer, recognizer)
            .with_options(DecodingOptions::from_config(config))
            .with_max_concurrency(config.max_concurrent_transcriptions)
            .with_timeout(config.transcription_timeout())
            .with_max_upload_bytes(config.max_upload_bytes))
    }

    pub fn with_options(mut self, options: DecodingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_max_concurrency(mut self, permits: usize) -> Self {
        self.permits = Semaphore::new(permits.max(1));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }

    pub fn model_name(&self) -> &str {
        self.recognizer.model_name()
    }

    /// Transcribe one uploaded file.
    ///
    /// The wall-clock timeout covers writing the upload, waiting for a permit,
    /// normalization and recognition. Both scratch files are removed before
    /// this returns, whatever the outcome.
    pub async fn transcribe_upload<S, E>(&self, upload: Upload<S>) -> Result<String, PipelineError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let started = Instant::now();
        let suffix = resolve_suffix(upload.media_type.as_deref(), upload.filename.as_deref());
        debug!(
            suffix,
            media_type = upload.media_type.as_deref().unwrap_or(""),
            "Resolved upload container"
        );

        let mut raw = self.store.create(suffix)?;
        let mut normalized: Option<TempArtifact> = None;

        let outcome = tokio::time::timeout(
            self.timeout,
            self.run(&mut raw, &mut normalized, upload.body),
        )
        .await;

        raw.remove().await;
        if let Some(ref mut artifact) = normalized {
            artifact.remove().await;
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(Ok(text)) => {
                info!(elapsed_ms, chars = text.chars().count(), "Transcription completed");
                Ok(text)
            }
            Ok(Err(e)) => {
                warn!(elapsed_ms, error = %e, "Transcription failed");
                Err(e)
            }
            Err(_) => {
                warn!(elapsed_ms, timeout_secs = self.timeout.as_secs(), "Transcription timed out");
                Err(PipelineError::TimedOut(self.timeout))
            }
        }
    }

    async fn run<S, E>(
        &self,
        raw: &mut TempArtifact,
        normalized: &mut Option<TempArtifact>,
        body: S,
    ) -> Result<String, PipelineError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: std::fmt::Display,
    {
        let bytes = self
            .store
            .write_stream(raw, body, self.max_upload_bytes)
            .await?;
        if bytes == 0 {
            return Err(PipelineError::EmptyUpload);
        }
        debug!(bytes, path = %raw.path().display(), "Upload stored");

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| PipelineError::Unavailable)?;

        let destination = normalized.insert(self.store.create("wav")?);
        destination.close();

        self.normalizer
            .normalize(raw.path(), destination.path())
            .await?;
        let info = ensure_canonical(destination.path())?;
        debug!(
            duration_secs = info.duration_secs(),
            frames = info.frames,
            "Canonical audio ready"
        );

        let text = self
            .recognizer
            .transcribe(destination.path(), &self.options)
            .await?;
        Ok(text.trim().to_string())
    }
}
