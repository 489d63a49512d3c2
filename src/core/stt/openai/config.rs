//! Connection settings for a Whisper-compatible transcription service.

use std::time::Duration;

use crate::config::ServerConfig;

/// Default recognition model preset.
pub const DEFAULT_WHISPER_MODEL: &str = "whisper-1";

/// Configuration for [`super::WhisperRecognizer`].
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Full transcription endpoint URL.
    pub api_url: String,

    /// Bearer token sent with every request. May be empty for local servers.
    pub api_key: String,

    /// Model preset requested from the service.
    pub model: String,

    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl WhisperConfig {
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: DEFAULT_WHISPER_MODEL.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Derive recognizer settings from the server configuration.
    ///
    /// The HTTP timeout follows the pipeline's wall-clock budget, which is the
    /// tighter bound on a single recognition call.
    pub fn from_server_config(config: &ServerConfig) -> Self {
        Self {
            api_url: config.stt_api_url(),
            api_key: config.stt_api_key().to_string(),
            model: config.stt_model.clone(),
            timeout: config.transcription_timeout(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.trim().is_empty() {
            return Err("Transcription endpoint URL is required".to_string());
        }
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(format!(
                "Transcription endpoint must be an http(s) URL, got {}",
                self.api_url
            ));
        }
        if self.model.trim().is_empty() {
            return Err("Model name is required".to_string());
        }
        if self.timeout.is_zero() {
            return Err("Timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_server_config_defaults_to_openai_endpoint() {
        let mut server = ServerConfig::with_api_key("sk-main");
        server.openai_base_url = "http://localhost:9999/v1".to_string();

        let config = WhisperConfig::from_server_config(&server);
        assert_eq!(config.api_url, "http://localhost:9999/v1/audio/transcriptions");
        assert_eq!(config.api_key, "sk-main");
        assert_eq!(config.model, "whisper-1");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_from_server_config_prefers_dedicated_service() {
        let mut server = ServerConfig::with_api_key("sk-main");
        server.stt_api_url = Some("http://whisper.local/v1/audio/transcriptions".to_string());
        server.stt_api_key = Some(String::new());
        server.stt_model = "large-v3".to_string();

        let config = WhisperConfig::from_server_config(&server);
        assert_eq!(config.api_url, "http://whisper.local/v1/audio/transcriptions");
        assert!(config.api_key.is_empty());
        assert_eq!(config.model, "large-v3");
    }

    #[test]
    fn test_validation() {
        assert!(WhisperConfig::new("k", "http://localhost/x").validate().is_ok());
        assert!(WhisperConfig::new("k", "").validate().is_err());
        assert!(WhisperConfig::new("k", "ftp://host/x").validate().is_err());

        let mut config = WhisperConfig::new("k", "http://localhost/x");
        config.model = " ".to_string();
        assert!(config.validate().unwrap_err().contains("Model"));
    }
}
