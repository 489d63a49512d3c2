//! Environment variable loading.
//!
//! Every setting starts from the defaults in [`ServerConfig::with_api_key`] and is
//! overridden by its environment variable when present and non-empty.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use super::{ConfigError, ServerConfig, TlsConfig};

/// Read a trimmed, non-empty environment variable.
fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable, reporting the key and raw value on failure.
fn parse<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

/// Build a configuration from the process environment without validating it.
///
/// Validation is left to the caller so YAML overrides can fill gaps first.
pub(super) fn load() -> Result<ServerConfig, ConfigError> {
    let mut config = ServerConfig::with_api_key(var("OPENAI_API_KEY").unwrap_or_default());

    if let Some(host) = var("HOST") {
        config.host = host;
    }
    if let Some(port) = parse("PORT")? {
        config.port = port;
    }

    config.tls = match (var("TLS_CERT_PATH"), var("TLS_KEY_PATH")) {
        (Some(cert), Some(key)) => Some(TlsConfig {
            cert_path: PathBuf::from(cert),
            key_path: PathBuf::from(key),
        }),
        (None, None) => None,
        _ => {
            return Err(ConfigError::Invalid(
                "TLS_CERT_PATH and TLS_KEY_PATH must be set together".to_string(),
            ));
        }
    };

    if let Some(url) = var("OPENAI_BASE_URL") {
        config.openai_base_url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = parse("UPSTREAM_TIMEOUT_SECONDS")? {
        config.upstream_timeout_seconds = secs;
    }

    if let Some(model) = var("CHAT_MODEL") {
        config.chat_model = model;
    }
    if let Some(tokens) = parse("CHAT_MAX_TOKENS")? {
        config.chat_max_tokens = tokens;
    }
    if let Some(tokens) = parse("EMOTION_MAX_TOKENS")? {
        config.emotion_max_tokens = tokens;
    }
    if let Some(offset) = parse("LOCAL_UTC_OFFSET_HOURS")? {
        config.local_utc_offset_hours = offset;
    }

    if let Some(model) = var("TTS_MODEL") {
        config.tts_model = model;
    }
    if let Some(voice) = var("TTS_VOICE") {
        config.tts_voice = voice;
    }
    if let Some(speed) = parse("TTS_SPEED")? {
        config.tts_speed = speed;
    }
    if let Some(n) = parse("TTS_MAX_SENTENCES")? {
        config.tts_max_sentences = n;
    }

    if let Some(url) = var("STT_API_URL") {
        config.stt_api_url = Some(url);
    }
    if let Some(key) = var("STT_API_KEY") {
        config.stt_api_key = Some(key);
    }
    if let Some(model) = var("STT_MODEL") {
        config.stt_model = model;
    }
    if let Some(language) = var("STT_LANGUAGE") {
        config.stt_language = language;
    }
    if let Some(prompt) = var("STT_PROMPT") {
        config.stt_prompt = Some(prompt);
    }
    if let Some(temperature) = parse("STT_TEMPERATURE")? {
        config.stt_temperature = temperature;
    }
    if let Some(beam) = parse("STT_BEAM_SIZE")? {
        config.stt_beam_size = beam;
    }
    if let Some(best_of) = parse("STT_BEST_OF")? {
        config.stt_best_of = best_of;
    }

    if let Some(path) = var("FFMPEG_PATH") {
        config.ffmpeg_path = PathBuf::from(path);
    }
    if let Some(dir) = var("AUDIO_TEMP_DIR") {
        config.audio_temp_dir = Some(PathBuf::from(dir));
    }
    if let Some(bytes) = parse("MAX_UPLOAD_BYTES")? {
        config.max_upload_bytes = bytes;
    }
    if let Some(bytes) = parse("MAX_REQUEST_BYTES")? {
        config.max_request_bytes = Some(bytes);
    }
    if let Some(n) = parse("MAX_CONCURRENT_TRANSCRIPTIONS")? {
        config.max_concurrent_transcriptions = n;
    }
    if let Some(secs) = parse("TRANSCRIPTION_TIMEOUT_SECONDS")? {
        config.transcription_timeout_seconds = secs;
    }

    if let Some(origins) = var("CORS_ALLOWED_ORIGINS") {
        config.cors_allowed_origins = Some(origins);
    }
    if let Some(rps) = parse("RATE_LIMIT_REQUESTS_PER_SECOND")? {
        config.rate_limit_requests_per_second = rps;
    }
    if let Some(burst) = parse("RATE_LIMIT_BURST_SIZE")? {
        config.rate_limit_burst_size = burst;
    }

    Ok(config)
}
