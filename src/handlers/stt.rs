use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::audio::{Upload, is_supported_media_type};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Name of the multipart part carrying the audio.
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscribeResponse {
    pub text: String,
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Invalid multipart body: {}", err.body_text()))
    }
}

/// Transcribe the uploaded audio file.
///
/// Parts other than `file` are skipped. The file is streamed to disk rather
/// than buffered in memory.
pub async fn transcribe(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<TranscribeResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            debug!(name = ?field.name(), "Skipping multipart part");
            continue;
        }

        let media_type = field.content_type().map(str::to_string);
        let filename = field.file_name().map(str::to_string);
        info!(
            media_type = media_type.as_deref().unwrap_or(""),
            filename = filename.as_deref().unwrap_or(""),
            "Transcription request"
        );

        if !is_supported_media_type(media_type.as_deref()) {
            return Err(AppError::UnsupportedMedia(
                media_type.unwrap_or_default(),
            ));
        }

        let text = state
            .pipeline
            .transcribe_upload(Upload {
                media_type,
                filename,
                body: field,
            })
            .await?;
        return Ok(Json(TranscribeResponse { text }));
    }

    Err(AppError::BadRequest(format!(
        "Missing '{FILE_FIELD}' part in multipart body"
    )))
}
