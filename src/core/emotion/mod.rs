//! Sentiment labels and parsing of the classifier's reply.
//!
//! The classifier is asked to answer in the fixed form
//! `감정: [긍정/부정/중립], 이유: [한 문장]`. Models do not always comply, so
//! parsing is best effort and never fails: whatever cannot be understood is
//! reported as [`EmotionLabel::Unknown`] with the raw reply as the reason.

use std::fmt;

use serde::{Deserialize, Serialize};

const LABEL_PREFIX: &str = "감정:";
const REASON_MARKER: &str = "이유:";

/// Sentiment classes reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmotionLabel {
    #[serde(rename = "긍정")]
    Positive,
    #[serde(rename = "부정")]
    Negative,
    #[serde(rename = "중립")]
    Neutral,
    #[serde(rename = "알수없음")]
    Unknown,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 4] = [
        EmotionLabel::Positive,
        EmotionLabel::Negative,
        EmotionLabel::Neutral,
        EmotionLabel::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "긍정",
            Self::Negative => "부정",
            Self::Neutral => "중립",
            Self::Unknown => "알수없음",
        }
    }

    /// Map a label as written by the model. Anything else is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "긍정" => Self::Positive,
            "부정" => Self::Negative,
            "중립" => Self::Neutral,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a `/emotion` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentReply {
    pub emotion: EmotionLabel,
    pub reason: String,
}

/// Remove the square brackets models sometimes copy from the template.
fn strip_brackets(s: &str) -> &str {
    s.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .trim()
}

/// Parse a classifier reply of the form `감정: X, 이유: Y`.
///
/// - Without the `감정:` prefix the label is unknown and the whole reply is
///   the reason.
/// - The label is the text between the first `:` and the first `,`.
/// - Without an `이유:` marker the whole reply is the reason.
pub fn parse_sentiment_reply(reply: &str) -> SentimentReply {
    let reply = reply.trim();

    let Some(rest) = reply.strip_prefix(LABEL_PREFIX) else {
        return SentimentReply {
            emotion: EmotionLabel::Unknown,
            reason: reply.to_string(),
        };
    };

    let raw_label = rest.split(',').next().unwrap_or_default();
    let emotion = EmotionLabel::from_label(strip_brackets(raw_label));

    let reason = match reply.split_once(REASON_MARKER) {
        Some((_, reason)) => strip_brackets(reason).to_string(),
        None => reply.to_string(),
    };

    SentimentReply { emotion, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_reply() {
        let parsed =
            parse_sentiment_reply("감정: 긍정, 이유: 기분이 좋다는 표현이 있습니다.");
        assert_eq!(parsed.emotion, EmotionLabel::Positive);
        assert_eq!(parsed.reason, "기분이 좋다는 표현이 있습니다.");
    }

    #[test]
    fn test_bracketed_reply() {
        let parsed = parse_sentiment_reply("감정: [부정], 이유: [허리 통증을 호소합니다.]");
        assert_eq!(parsed.emotion, EmotionLabel::Negative);
        assert_eq!(parsed.reason, "허리 통증을 호소합니다.");
    }

    #[test]
    fn test_reason_with_commas_is_kept_whole() {
        let parsed = parse_sentiment_reply("감정: 중립, 이유: 날씨, 식사, 산책 이야기입니다.");
        assert_eq!(parsed.emotion, EmotionLabel::Neutral);
        assert_eq!(parsed.reason, "날씨, 식사, 산책 이야기입니다.");
    }

    #[test]
    fn test_missing_prefix_falls_back_to_raw_text() {
        let parsed = parse_sentiment_reply("  이 문장은 긍정적입니다.  ");
        assert_eq!(parsed.emotion, EmotionLabel::Unknown);
        assert_eq!(parsed.reason, "이 문장은 긍정적입니다.");
    }

    #[test]
    fn test_missing_reason_marker_keeps_label() {
        let parsed = parse_sentiment_reply("감정: 긍정");
        assert_eq!(parsed.emotion, EmotionLabel::Positive);
        assert_eq!(parsed.reason, "감정: 긍정");
    }

    #[test]
    fn test_label_outside_set_is_unknown() {
        let parsed = parse_sentiment_reply("감정: 기쁨, 이유: 웃고 있습니다.");
        assert_eq!(parsed.emotion, EmotionLabel::Unknown);
        assert_eq!(parsed.reason, "웃고 있습니다.");
    }

    #[test]
    fn test_empty_reply() {
        let parsed = parse_sentiment_reply("");
        assert_eq!(parsed.emotion, EmotionLabel::Unknown);
        assert_eq!(parsed.reason, "");
    }

    #[test]
    fn test_serializes_korean_labels() {
        let json = serde_json::to_value(SentimentReply {
            emotion: EmotionLabel::Neutral,
            reason: "평범한 하루".to_string(),
        })
        .unwrap();
        assert_eq!(json["emotion"], "중립");
        assert_eq!(json["reason"], "평범한 하루");
    }

    #[test]
    fn test_label_round_trip_through_text() {
        for label in EmotionLabel::ALL {
            assert_eq!(EmotionLabel::from_label(label.as_str()), label);
        }
    }
}
