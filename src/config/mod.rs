//! Configuration module for the Ddobaki gateway
//!
//! This module handles server configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `env`: Environment variable loading
//! - `yaml`: YAML configuration file loading and merging
//!
//! # Example
//! ```rust,no_run
//! use ddobaki_gateway::config::ServerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ServerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable overrides
//! let config_path = PathBuf::from("config.yaml");
//! let config = ServerConfig::from_file(&config_path)?;
//!
//! println!("Server listening on {}", config.address());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::stt::DEFAULT_VOCABULARY_HINT;

mod env;
mod yaml;

pub use yaml::YamlConfig;

/// Default OpenAI-compatible API base URL
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Default upload cap (25 MiB, the Whisper API file limit)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Headroom for multipart boundaries and part headers when no explicit
/// request cap is configured
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required setting is absent
    #[error("Missing required configuration: {0}")]
    Missing(String),

    /// A setting could not be parsed
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// A setting parsed but is out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// The YAML file could not be read
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML file is malformed
    #[error("Failed to parse YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// TLS configuration for HTTPS
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Path to the TLS certificate file (PEM format)
    pub cert_path: PathBuf,
    /// Path to the TLS private key file (PEM format)
    pub key_path: PathBuf,
}

/// Server configuration
///
/// Contains all configuration needed to run the gateway, including:
/// - Server settings (host, port, TLS)
/// - Completion, synthesis and recognition service settings
/// - Audio pipeline limits (upload size, concurrency, wall-clock timeout)
/// - Security settings (CORS, rate limiting)
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // Server settings
    pub host: String,
    pub port: u16,

    // TLS configuration (optional)
    pub tls: Option<TlsConfig>,

    // Completion service
    /// API key for the completion and synthesis services (required)
    pub openai_api_key: String,
    /// Base URL of the OpenAI-compatible API, without trailing slash
    pub openai_base_url: String,
    /// Per-request timeout for upstream calls
    pub upstream_timeout_seconds: u64,

    // Chat settings
    pub chat_model: String,
    pub chat_max_tokens: u32,
    pub emotion_max_tokens: u32,
    /// UTC offset used when telling the model today's date
    pub local_utc_offset_hours: i8,

    // Speech synthesis settings
    pub tts_model: String,
    pub tts_voice: String,
    pub tts_speed: f32,
    /// Number of sentences kept from a chat reply before synthesis
    pub tts_max_sentences: usize,

    // Speech recognition settings
    /// Full transcription endpoint URL; defaults to `{openai_base_url}/audio/transcriptions`
    pub stt_api_url: Option<String>,
    /// Key for the recognition service; defaults to `openai_api_key`
    pub stt_api_key: Option<String>,
    /// Recognition model preset, loaded once at startup
    pub stt_model: String,
    pub stt_language: String,
    pub stt_prompt: Option<String>,
    pub stt_temperature: f32,
    /// Beam-search width (0 = server default). Only sent to self-hosted
    /// Whisper servers (`stt_api_url` set); the hosted OpenAI endpoint does
    /// not accept it.
    pub stt_beam_size: u32,
    /// Candidates retained per decode (0 = server default). Same scope as
    /// `stt_beam_size`.
    pub stt_best_of: u32,

    // Audio pipeline
    pub ffmpeg_path: PathBuf,
    /// Scratch directory for uploads; defaults to the OS temp dir
    pub audio_temp_dir: Option<PathBuf>,
    /// Cap on the uploaded file itself; larger files are rejected with 413
    pub max_upload_bytes: usize,
    /// Cap on the whole `/stt/transcribe` request body, all parts included.
    /// Defaults to twice `max_upload_bytes` (see [`ServerConfig::request_body_limit`]).
    pub max_request_bytes: Option<usize>,
    pub max_concurrent_transcriptions: usize,
    pub transcription_timeout_seconds: u64,

    // Security configuration
    /// CORS allowed origins (comma-separated list or "*" for all)
    /// Default: None (CORS disabled, same-origin only)
    pub cors_allowed_origins: Option<String>,
    /// Maximum requests per second per IP address (>= 100000 disables limiting)
    pub rate_limit_requests_per_second: u32,
    /// Maximum burst size for rate limiting
    pub rate_limit_burst_size: u32,
}

/// Zeroize secret fields when the configuration is dropped.
impl Drop for ServerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        self.openai_api_key.zeroize();
        if let Some(ref mut key) = self.stt_api_key {
            key.zeroize();
        }
    }
}

impl ServerConfig {
    /// Build a configuration holding only defaults and the given API key.
    ///
    /// `ServerConfig` implements `Drop`, so struct-update syntax is unavailable;
    /// start from this and assign the fields you need.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            tls: None,
            openai_api_key: api_key.into(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            upstream_timeout_seconds: 60,
            chat_model: "gpt-4o-mini".to_string(),
            chat_max_tokens: 200,
            emotion_max_tokens: 100,
            local_utc_offset_hours: 9,
            tts_model: "tts-1".to_string(),
            tts_voice: "nova".to_string(),
            tts_speed: 1.0,
            tts_max_sentences: 3,
            stt_api_url: None,
            stt_api_key: None,
            stt_model: "whisper-1".to_string(),
            stt_language: "ko".to_string(),
            stt_prompt: Some(DEFAULT_VOCABULARY_HINT.to_string()),
            stt_temperature: 0.0,
            stt_beam_size: 5,
            stt_best_of: 5,
            ffmpeg_path: PathBuf::from("ffmpeg"),
            audio_temp_dir: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_request_bytes: None,
            max_concurrent_transcriptions: 2,
            transcription_timeout_seconds: 120,
            cors_allowed_origins: None,
            rate_limit_requests_per_second: 60,
            rate_limit_burst_size: 10,
        }
    }

    /// Load configuration from environment variables
    ///
    /// The .env file is loaded in main.rs before this is called, so actual
    /// environment variables override .env values.
    ///
    /// # Errors
    /// Returns an error if a variable has an invalid format, `OPENAI_API_KEY`
    /// is missing, or validation fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = env::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After loading and merging, performs validation on the final configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml_config = YamlConfig::from_file(path)?;

        let mut config = env::load()?;
        yaml_config.apply(&mut config);

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints and ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.openai_api_key.trim().is_empty() {
            return Err(ConfigError::Missing("OPENAI_API_KEY".to_string()));
        }
        if self.openai_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "OPENAI_BASE_URL must not be empty".to_string(),
            ));
        }
        if self.upstream_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "UPSTREAM_TIMEOUT_SECONDS must be greater than 0".to_string(),
            ));
        }
        if self.max_concurrent_transcriptions == 0 {
            return Err(ConfigError::Invalid(
                "MAX_CONCURRENT_TRANSCRIPTIONS must be greater than 0".to_string(),
            ));
        }
        if self.transcription_timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "TRANSCRIPTION_TIMEOUT_SECONDS must be greater than 0".to_string(),
            ));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "MAX_UPLOAD_BYTES must be greater than 0".to_string(),
            ));
        }
        if let Some(limit) = self.max_request_bytes
            && limit <= self.max_upload_bytes
        {
            return Err(ConfigError::Invalid(format!(
                "MAX_REQUEST_BYTES ({limit}) must exceed MAX_UPLOAD_BYTES ({})",
                self.max_upload_bytes
            )));
        }
        if !(0.25..=4.0).contains(&self.tts_speed) {
            return Err(ConfigError::Invalid(format!(
                "TTS_SPEED must be between 0.25 and 4.0, got {}",
                self.tts_speed
            )));
        }
        if self.tts_max_sentences == 0 {
            return Err(ConfigError::Invalid(
                "TTS_MAX_SENTENCES must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.stt_temperature) {
            return Err(ConfigError::Invalid(format!(
                "STT_TEMPERATURE must be between 0.0 and 1.0, got {}",
                self.stt_temperature
            )));
        }
        if !(-12..=14).contains(&self.local_utc_offset_hours) {
            return Err(ConfigError::Invalid(format!(
                "LOCAL_UTC_OFFSET_HOURS must be between -12 and 14, got {}",
                self.local_utc_offset_hours
            )));
        }
        if let Some(ref tls) = self.tls
            && (tls.cert_path.as_os_str().is_empty() || tls.key_path.as_os_str().is_empty())
        {
            return Err(ConfigError::Invalid(
                "TLS requires both a certificate and a key path".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the server address as a string
    ///
    /// Returns the address in the format "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check if TLS is enabled
    pub fn is_tls_enabled(&self) -> bool {
        self.tls.is_some()
    }

    /// Body limit for the upload route.
    ///
    /// Independent of the file cap so that extra form fields never turn an
    /// in-limit file into a 413.
    pub fn request_body_limit(&self) -> usize {
        self.max_request_bytes.unwrap_or_else(|| {
            self.max_upload_bytes
                .saturating_mul(2)
                .max(self.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }

    pub fn transcription_timeout(&self) -> Duration {
        Duration::from_secs(self.transcription_timeout_seconds)
    }

    /// Resolved transcription endpoint
    pub fn stt_api_url(&self) -> String {
        match self.stt_api_url {
            Some(ref url) => url.clone(),
            None => format!(
                "{}/audio/transcriptions",
                self.openai_base_url.trim_end_matches('/')
            ),
        }
    }

    /// Key for the recognition service, falling back to the completion key
    pub fn stt_api_key(&self) -> &str {
        self.stt_api_key
            .as_deref()
            .unwrap_or(self.openai_api_key.as_str())
    }

    /// Scratch directory for temporary audio artifacts
    pub fn audio_temp_dir(&self) -> PathBuf {
        self.audio_temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Offset used for the date shown to the model
    pub fn local_utc_offset(&self) -> time::UtcOffset {
        time::UtcOffset::from_hms(self.local_utc_offset_hours, 0, 0).unwrap_or(time::UtcOffset::UTC)
    }
}
