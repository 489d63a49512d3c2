//! Speech recognition.
//!
//! - [`SpeechRecognizer`]: the model handle the transcription pipeline is built with
//! - [`openai`]: a Whisper-compatible REST implementation
//!   (`POST /audio/transcriptions`), usable against OpenAI or a self-hosted
//!   Whisper server

mod base;
pub mod openai;

pub use base::{DEFAULT_VOCABULARY_HINT, DecodingOptions, STTError, SpeechRecognizer};
pub use openai::{WhisperConfig, WhisperRecognizer};
