//! OpenAI-compatible chat completions (`POST {base_url}/chat/completions`).

mod client;
mod config;
mod messages;


pub use client::OpenAIChat;
pub use config::OpenAIChatConfig;
