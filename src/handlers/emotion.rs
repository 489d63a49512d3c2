use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use tracing::{debug, info};

use crate::core::emotion::{SentimentReply, parse_sentiment_reply};
use crate::core::llm::prompts;
use crate::errors::{AppError, AppResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct EmotionRequest {
    pub user_input: String,
}

/// Classify the sentiment of the user's text.
///
/// A reply that does not follow the expected format still yields a response
/// with the `알수없음` label.
pub async fn emotion(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmotionRequest>,
) -> AppResult<Json<SentimentReply>> {
    if request.user_input.trim().is_empty() {
        return Err(AppError::BadRequest("user_input must not be empty".to_string()));
    }
    info!(chars = request.user_input.chars().count(), "Emotion request");

    let completion =
        prompts::sentiment_request(&request.user_input, state.config.emotion_max_tokens);
    let answer = state.chat.complete(completion).await?;
    debug!(answer = %answer, "Classifier reply");

    let parsed = parse_sentiment_reply(&answer);
    info!(emotion = %parsed.emotion, "Emotion classified");
    Ok(Json(parsed))
}
