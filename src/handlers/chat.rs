use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::llm::prompts;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub user_input: String,
    /// Prefix the message with the medication reminder
    #[serde(default)]
    pub medicine_time: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub response: String,
}

/// Ask the companion persona for a reply.
///
/// Shared by `/chat` and `/chat-tts`.
pub(crate) async fn companion_reply(state: &AppState, request: &ChatRequest) -> AppResult<String> {
    if request.user_input.trim().is_empty() {
        return Err(AppError::BadRequest("user_input must not be empty".to_string()));
    }

    let today = prompts::today(state.config.local_utc_offset());
    let completion = prompts::companion_request(
        &request.user_input,
        request.medicine_time,
        today,
        state.config.chat_max_tokens,
    );

    let reply = state.chat.complete(completion).await?;
    Ok(reply)
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    info!(
        chars = request.user_input.chars().count(),
        medicine_time = request.medicine_time,
        "Chat request"
    );

    let response = companion_reply(&state, &request).await?;
    Ok(Json(ChatResponse { response }))
}
