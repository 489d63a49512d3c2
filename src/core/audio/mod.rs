//! Audio ingestion for the transcription endpoint.
//!
//! - [`content_type`]: media type → container suffix
//! - [`temp_store`]: scoped scratch files
//! - [`normalizer`]: transcoding to mono 16 kHz PCM WAV
//! - [`pipeline`]: the end-to-end [`TranscriptionPipeline`]

pub mod content_type;
pub mod normalizer;
pub mod pipeline;
pub mod temp_store;

pub use content_type::{DEFAULT_SUFFIX, is_supported_media_type, resolve_suffix};
pub use normalizer::{
    AudioNormalizer, FfmpegNormalizer, NormalizationError, WavInfo, ensure_canonical, inspect_wav,
};
pub use pipeline::{PipelineError, TranscriptionPipeline, Upload};
pub use temp_store::{StorageError, TempArtifact, TempStore, WriteError};
