use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::info;

use super::chat::{ChatRequest, companion_reply};
use crate::core::tts::{SynthesizedAudio, limit_sentences};
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

/// Download name for spoken chat replies.
pub const CHAT_REPLY_FILENAME: &str = "chatbot_reply.mp3";

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    pub text: String,
}

fn audio_response(audio: SynthesizedAudio, attachment: Option<&'static str>) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(audio.content_type),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(audio.data.len()));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    if let Some(filename) = attachment
        && let Ok(value) = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
    {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    (StatusCode::OK, headers, audio.data).into_response()
}

/// Synthesize the given text as MP3.
pub async fn speak(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpeakRequest>,
) -> AppResult<Response> {
    let text = request.text.trim();
    if text.is_empty() {
        return Err(AppError::BadRequest("text must not be empty".to_string()));
    }
    info!(chars = text.chars().count(), "TTS request");

    let audio = state.tts.synthesize(text).await?;
    Ok(audio_response(audio, None))
}

/// Generate a companion reply and return it spoken.
///
/// Only the first few sentences are synthesized to keep the clip short.
pub async fn chat_speak(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Response> {
    info!(
        chars = request.user_input.chars().count(),
        medicine_time = request.medicine_time,
        "Chat TTS request"
    );

    let reply = companion_reply(&state, &request).await?;
    let spoken = limit_sentences(&reply, state.config.tts_max_sentences);
    if spoken.is_empty() {
        return Err(AppError::Upstream(
            "Completion service returned an empty reply".to_string(),
        ));
    }

    let audio = state.tts.synthesize(&spoken).await?;
    Ok(audio_response(audio, Some(CHAT_REPLY_FILENAME)))
}
