use axum::Json;
use serde_json::{Value, json};

pub const GREETING: &str = "Hello from ddobaki chatbot!";

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "message": GREETING }))
}
