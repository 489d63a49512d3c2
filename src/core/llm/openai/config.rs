use std::time::Duration;

use crate::config::{DEFAULT_OPENAI_BASE_URL, ServerConfig};

/// Configuration for [`super::OpenAIChat`].
#[derive(Debug, Clone)]
pub struct OpenAIChatConfig {
    pub api_key: String,
    /// Base URL without trailing slash
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAIChatConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn from_server_config(config: &ServerConfig) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            model: config.chat_model.clone(),
            timeout: config.upstream_timeout(),
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}
