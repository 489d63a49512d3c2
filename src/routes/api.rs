use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers::{api, chat, emotion, speak, stt};
use crate::state::AppState;

/// Create the API router.
///
/// `request_body_limit` caps the whole multipart body on the upload route
/// (see [`ServerConfig::request_body_limit`]). The file-size cap is enforced
/// separately by the transcription pipeline.
///
/// [`ServerConfig::request_body_limit`]: crate::config::ServerConfig::request_body_limit
pub fn create_api_router(request_body_limit: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(api::health_check))
        .route("/chat", post(chat::chat))
        .route("/emotion", post(emotion::emotion))
        .route("/tts", post(speak::speak))
        .route("/chat-tts", post(speak::chat_speak))
        .route(
            "/stt/transcribe",
            post(stt::transcribe).layer(DefaultBodyLimit::max(request_body_limit)),
        )
        .layer(TraceLayer::new_for_http())
}
