//! Wire types and helpers shared by every OpenAI-compatible client.
//!
//! The chat, speech and transcription clients all talk to endpoints that report
//! failures with the same error envelope:
//!
//! ```json
//! { "error": { "message": "...", "type": "invalid_request_error", "param": null, "code": null } }
//! ```

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// OpenAI API error response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAIErrorResponse {
    /// Error details.
    pub error: OpenAIError,
}

/// OpenAI API error details.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAIError {
    /// Human-readable error message.
    pub message: String,

    /// Error type identifier.
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,

    /// Parameter that caused the error (if applicable).
    #[serde(default)]
    pub param: Option<String>,

    /// Error code (if applicable).
    #[serde(default)]
    pub code: Option<String>,
}

impl std::fmt::Display for OpenAIError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.error_type {
            Some(ref kind) => write!(f, "{} ({})", self.message, kind),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for OpenAIError {}

/// Render a non-success upstream response into a single diagnostic line.
///
/// Prefers the structured error envelope and falls back to the raw body.
pub fn describe_error(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<OpenAIErrorResponse>(body) {
        Ok(parsed) => format!("OpenAI API error ({}): {}", status.as_u16(), parsed.error),
        Err(_) => {
            let body = body.trim();
            if body.is_empty() {
                format!("OpenAI API error ({})", status)
            } else {
                format!("OpenAI API error ({}): {}", status.as_u16(), body)
            }
        }
    }
}

/// Build an HTTP client with the shared timeout and pooling defaults.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .pool_max_idle_per_host(4)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_structured_error() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error", "param": null, "code": "invalid_api_key"}}"#;
        let msg = describe_error(StatusCode::UNAUTHORIZED, body);
        assert_eq!(
            msg,
            "OpenAI API error (401): Incorrect API key provided (invalid_request_error)"
        );
    }

    #[test]
    fn test_describe_error_without_type() {
        let body = r#"{"error": {"message": "model overloaded"}}"#;
        let msg = describe_error(StatusCode::SERVICE_UNAVAILABLE, body);
        assert_eq!(msg, "OpenAI API error (503): model overloaded");
    }

    #[test]
    fn test_describe_unstructured_error() {
        let msg = describe_error(StatusCode::BAD_GATEWAY, "upstream connect error");
        assert_eq!(msg, "OpenAI API error (502): upstream connect error");
    }

    #[test]
    fn test_describe_empty_body() {
        let msg = describe_error(StatusCode::INTERNAL_SERVER_ERROR, "  ");
        assert!(msg.contains("500"));
    }
}
