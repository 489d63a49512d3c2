//! Response types for the transcription endpoint.

use serde::{Deserialize, Serialize};

/// Body returned for `response_format=json`.
///
/// Servers that add fields (language, duration, segments) are tolerated;
/// only the text is used.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TranscriptionResponse {
    /// Recognized text. Missing or null is treated as no speech.
    #[serde(default)]
    pub text: Option<String>,
}

impl TranscriptionResponse {
    /// Recognized text with surrounding whitespace removed.
    pub fn into_text(self) -> String {
        self.text.map(|t| t.trim().to_string()).unwrap_or_default()
    }
}
