//! OpenAI text-to-speech (`/audio/speech`).
//!
//! Models: `tts-1`, `tts-1-hd`, `gpt-4o-mini-tts`. Output is always MP3.

mod config;
mod provider;

pub use config::{OpenAITTSConfig, OpenAITTSModel, OpenAIVoice};
pub use provider::OpenAITTS;
