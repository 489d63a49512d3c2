//! HTTP request handlers
//!
//! - `api` - Health check endpoint
//! - `chat` - Companion chat replies
//! - `emotion` - Sentiment classification
//! - `speak` - Text-to-speech and spoken chat replies
//! - `stt` - Audio upload transcription

pub mod api;
pub mod chat;
pub mod emotion;
pub mod speak;
pub mod stt;
