//! Whisper-compatible transcription client.
//!
//! Speaks the OpenAI Audio Transcription REST API (`POST /audio/transcriptions`),
//! which is also served by self-hosted Whisper servers. The model preset is
//! resolved once in [`WhisperRecognizer::load`] and the handle is then shared
//! across requests.
//!
//! - [`config`]: connection settings (`WhisperConfig`)
//! - [`messages`]: response types
//! - [`client`]: the [`WhisperRecognizer`] implementation of `SpeechRecognizer`
//!
//! # Example
//!
//! ```rust,no_run
//! use ddobaki_gateway::core::stt::{DecodingOptions, SpeechRecognizer, WhisperConfig, WhisperRecognizer};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = WhisperConfig::new("sk-your-key", "https://api.openai.com/v1/audio/transcriptions");
//!     let recognizer = WhisperRecognizer::load(config)?;
//!
//!     let text = recognizer
//!         .transcribe(Path::new("/tmp/clip.wav"), &DecodingOptions::default())
//!         .await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod messages;


pub use client::WhisperRecognizer;
pub use config::WhisperConfig;
pub use messages::TranscriptionResponse;
