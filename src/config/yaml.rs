use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{ConfigError, ServerConfig, TlsConfig};

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here
/// override whatever the environment supplied.
///
/// # Example YAML structure
/// ```yaml
/// server:
///   host: "0.0.0.0"
///   port: 8000
///
/// openai:
///   api_key: "sk-..."
///   base_url: "https://api.openai.com/v1"
///   timeout_seconds: 60
///
/// chat:
///   model: "gpt-4o-mini"
///   max_tokens: 200
///   emotion_max_tokens: 100
///   utc_offset_hours: 9
///
/// tts:
///   model: "tts-1"
///   voice: "nova"
///   speed: 1.0
///   max_sentences: 3
///
/// stt:
///   api_url: "http://localhost:8080/v1/audio/transcriptions"
///   model: "whisper-1"
///   language: "ko"
///   prompt: "일기, 감정, 병원"
///   temperature: 0.0
///   beam_size: 5
///   best_of: 5
///
/// audio:
///   ffmpeg_path: "/usr/bin/ffmpeg"
///   temp_dir: "/var/tmp/ddobaki"
///   max_upload_bytes: 26214400
///   max_request_bytes: 52428800
///   max_concurrent_transcriptions: 2
///   timeout_seconds: 120
///
/// security:
///   cors_allowed_origins: "*"
///   rate_limit_requests_per_second: 60
///   rate_limit_burst_size: 10
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub server: Option<ServerYaml>,
    pub openai: Option<OpenAIYaml>,
    pub chat: Option<ChatYaml>,
    pub tts: Option<TtsYaml>,
    pub stt: Option<SttYaml>,
    pub audio: Option<AudioYaml>,
    pub security: Option<SecurityYaml>,
}

/// Server configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServerYaml {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub tls: Option<TlsYaml>,
}

/// TLS configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TlsYaml {
    pub enabled: Option<bool>,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OpenAIYaml {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ChatYaml {
    pub model: Option<String>,
    pub max_tokens: Option<u32>,
    pub emotion_max_tokens: Option<u32>,
    pub utc_offset_hours: Option<i8>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TtsYaml {
    pub model: Option<String>,
    pub voice: Option<String>,
    pub speed: Option<f32>,
    pub max_sentences: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SttYaml {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub temperature: Option<f32>,
    pub beam_size: Option<u32>,
    pub best_of: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AudioYaml {
    pub ffmpeg_path: Option<String>,
    pub temp_dir: Option<String>,
    pub max_upload_bytes: Option<usize>,
    pub max_request_bytes: Option<usize>,
    pub max_concurrent_transcriptions: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

/// Security configuration from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct SecurityYaml {
    pub cors_allowed_origins: Option<String>,
    pub rate_limit_requests_per_second: Option<u32>,
    pub rate_limit_burst_size: Option<u32>,
}

impl YamlConfig {
    /// Read and parse a YAML configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&contents)
    }

    /// Parse YAML configuration from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    /// Overlay every value present in this file onto `config`.
    pub fn apply(&self, config: &mut ServerConfig) {
        if let Some(ref server) = self.server {
            if let Some(ref host) = server.host {
                config.host = host.clone();
            }
            if let Some(port) = server.port {
                config.port = port;
            }
            if let Some(ref tls) = server.tls {
                if tls.enabled == Some(false) {
                    config.tls = None;
                } else if let (Some(cert), Some(key)) = (&tls.cert_path, &tls.key_path) {
                    config.tls = Some(TlsConfig {
                        cert_path: PathBuf::from(cert),
                        key_path: PathBuf::from(key),
                    });
                }
            }
        }

        if let Some(ref openai) = self.openai {
            if let Some(ref key) = openai.api_key {
                config.openai_api_key = key.clone();
            }
            if let Some(ref url) = openai.base_url {
                config.openai_base_url = url.trim_end_matches('/').to_string();
            }
            if let Some(secs) = openai.timeout_seconds {
                config.upstream_timeout_seconds = secs;
            }
        }

        if let Some(ref chat) = self.chat {
            if let Some(ref model) = chat.model {
                config.chat_model = model.clone();
            }
            if let Some(tokens) = chat.max_tokens {
                config.chat_max_tokens = tokens;
            }
            if let Some(tokens) = chat.emotion_max_tokens {
                config.emotion_max_tokens = tokens;
            }
            if let Some(offset) = chat.utc_offset_hours {
                config.local_utc_offset_hours = offset;
            }
        }

        if let Some(ref tts) = self.tts {
            if let Some(ref model) = tts.model {
                config.tts_model = model.clone();
            }
            if let Some(ref voice) = tts.voice {
                config.tts_voice = voice.clone();
            }
            if let Some(speed) = tts.speed {
                config.tts_speed = speed;
            }
            if let Some(n) = tts.max_sentences {
                config.tts_max_sentences = n;
            }
        }

        if let Some(ref stt) = self.stt {
            if let Some(ref url) = stt.api_url {
                config.stt_api_url = Some(url.clone());
            }
            if let Some(ref key) = stt.api_key {
                config.stt_api_key = Some(key.clone());
            }
            if let Some(ref model) = stt.model {
                config.stt_model = model.clone();
            }
            if let Some(ref language) = stt.language {
                config.stt_language = language.clone();
            }
            if let Some(ref prompt) = stt.prompt {
                config.stt_prompt = Some(prompt.clone()).filter(|p| !p.is_empty());
            }
            if let Some(temperature) = stt.temperature {
                config.stt_temperature = temperature;
            }
            if let Some(beam) = stt.beam_size {
                config.stt_beam_size = beam;
            }
            if let Some(best_of) = stt.best_of {
                config.stt_best_of = best_of;
            }
        }

        if let Some(ref audio) = self.audio {
            if let Some(ref path) = audio.ffmpeg_path {
                config.ffmpeg_path = PathBuf::from(path);
            }
            if let Some(ref dir) = audio.temp_dir {
                config.audio_temp_dir = Some(PathBuf::from(dir));
            }
            if let Some(bytes) = audio.max_upload_bytes {
                config.max_upload_bytes = bytes;
            }
            if let Some(bytes) = audio.max_request_bytes {
                config.max_request_bytes = Some(bytes);
            }
            if let Some(n) = audio.max_concurrent_transcriptions {
                config.max_concurrent_transcriptions = n;
            }
            if let Some(secs) = audio.timeout_seconds {
                config.transcription_timeout_seconds = secs;
            }
        }

        if let Some(ref security) = self.security {
            if let Some(ref origins) = security.cors_allowed_origins {
                config.cors_allowed_origins = Some(origins.clone());
            }
            if let Some(rps) = security.rate_limit_requests_per_second {
                config.rate_limit_requests_per_second = rps;
            }
            if let Some(burst) = security.rate_limit_burst_size {
                config.rate_limit_burst_size = burst;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_yaml_overrides_only_present_fields() {
        let yaml = r#"
server:
  port: 9000
stt:
  beam_size: 8
  language: "ko"
audio:
  max_concurrent_transcriptions: 4
  max_request_bytes: 60000000
"#;
        let parsed = YamlConfig::from_str(yaml).unwrap();
        let mut config = ServerConfig::with_api_key("sk-test");
        parsed.apply(&mut config);

        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.stt_beam_size, 8);
        assert_eq!(config.stt_best_of, 5);
        assert_eq!(config.max_concurrent_transcriptions, 4);
        assert_eq!(config.max_request_bytes, Some(60_000_000));
    }

    #[test]
    fn test_yaml_can_supply_api_key() {
        let yaml = "openai:\n  api_key: \"sk-yaml\"\n  base_url: \"http://proxy/v1/\"\n";
        let parsed = YamlConfig::from_str(yaml).unwrap();
        let mut config = ServerConfig::with_api_key("");
        parsed.apply(&mut config);

        assert_eq!(config.openai_api_key, "sk-yaml");
        assert_eq!(config.openai_base_url, "http://proxy/v1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_tls_disabled_flag_clears_tls() {
        let yaml = "server:\n  tls:\n    enabled: false\n    cert_path: a\n    key_path: b\n";
        let parsed = YamlConfig::from_str(yaml).unwrap();
        let mut config = ServerConfig::with_api_key("sk-test");
        parsed.apply(&mut config);
        assert!(config.tls.is_none());
    }

    #[test]
    fn test_empty_prompt_disables_hint() {
        let parsed = YamlConfig::from_str("stt:\n  prompt: \"\"\n").unwrap();
        let mut config = ServerConfig::with_api_key("sk-test");
        parsed.apply(&mut config);
        assert!(config.stt_prompt.is_none());
    }

    #[test]
    fn test_malformed_yaml_is_an_error() {
        let result = YamlConfig::from_str("server: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_from_file_reads_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chat:\n  model: \"gpt-4o\"").unwrap();

        let parsed = YamlConfig::from_file(file.path()).unwrap();
        assert_eq!(
            parsed.chat.and_then(|c| c.model).as_deref(),
            Some("gpt-4o")
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = YamlConfig::from_file(Path::new("/nonexistent/ddobaki.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
