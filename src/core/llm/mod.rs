//! Conversational completion.
//!
//! - [`ChatCompletion`]: the seam every handler talks to
//! - [`openai`]: an OpenAI-compatible `/chat/completions` client
//! - [`prompts`]: the companion persona and the sentiment classifier prompts

mod base;
pub mod openai;
pub mod prompts;

pub use base::{ChatCompletion, ChatMessage, ChatRequest, LLMError, Role};
pub use openai::{OpenAIChat, OpenAIChatConfig};
