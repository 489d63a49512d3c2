//! Error type returned by every HTTP handler.
//!
//! Lower layers report their own error enums; they are folded into
//! [`AppError`] here and rendered as `{"error": "<message>"}` with a status
//! code chosen per kind. Nothing is retried.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::config::ConfigError;
use crate::core::audio::{NormalizationError, PipelineError, StorageError};
use crate::core::llm::LLMError;
use crate::core::stt::STTError;
use crate::core::tts::TTSError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Upstream service error: {0}")]
    Upstream(String),
    #[error("Unsupported media type: {0}")]
    UnsupportedMedia(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Normalization error: {0}")]
    Normalization(String),
    #[error("Transcription error: {0}")]
    Transcription(String),
    #[error("Timed out: {0}")]
    Timeout(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::UnsupportedMedia(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Storage(_) | Self::Normalization(_) | Self::Transcription(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), "{}", message);
        } else {
            warn!(status = status.as_u16(), "{}", message);
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<LLMError> for AppError {
    fn from(err: LLMError) -> Self {
        match err {
            LLMError::ConfigurationError(msg) => Self::Configuration(msg),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<TTSError> for AppError {
    fn from(err: TTSError) -> Self {
        match err {
            TTSError::InvalidInput(msg) => Self::BadRequest(msg),
            TTSError::InvalidConfiguration(msg) => Self::Configuration(msg),
            other => Self::Upstream(other.to_string()),
        }
    }
}

impl From<STTError> for AppError {
    fn from(err: STTError) -> Self {
        Self::Transcription(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<NormalizationError> for AppError {
    fn from(err: NormalizationError) -> Self {
        Self::Normalization(err.to_string())
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Storage(e) => e.into(),
            PipelineError::Normalization(e) => e.into(),
            PipelineError::Transcription(e) => e.into(),
            e @ PipelineError::UploadTooLarge { .. } => Self::PayloadTooLarge(e.to_string()),
            e @ (PipelineError::EmptyUpload | PipelineError::Upload(_)) => {
                Self::BadRequest(e.to_string())
            }
            e @ PipelineError::Unavailable => Self::Transcription(e.to_string()),
            e @ PipelineError::TimedOut(_) => Self::Timeout(e.to_string()),
        }
    }
}
