pub mod audio;
pub mod emotion;
pub mod llm;
pub mod providers;
pub mod stt;
pub mod tts;

pub use audio::{PipelineError, TranscriptionPipeline};
pub use emotion::{EmotionLabel, SentimentReply, parse_sentiment_reply};
pub use llm::{ChatCompletion, LLMError, OpenAIChat};
pub use stt::{DecodingOptions, STTError, SpeechRecognizer, WhisperRecognizer};
pub use tts::{OpenAITTS, SpeechSynthesizer, TTSError};
