//! Speech synthesis.
//!
//! - [`SpeechSynthesizer`]: synthesize a whole clip from text
//! - [`openai`]: the OpenAI `/audio/speech` implementation
//! - [`limit_sentences`]: shorten replies before they are spoken

mod base;
pub mod openai;
mod text;

pub use base::{SpeechSynthesizer, SynthesizedAudio, TTSError};
pub use openai::{OpenAITTS, OpenAITTSConfig, OpenAITTSModel, OpenAIVoice};
pub use text::{limit_sentences, split_sentences};
