//! Prompt construction for the companion chatbot and the sentiment classifier.

use time::{Date, OffsetDateTime, UtcOffset};

use super::base::ChatRequest;

/// Prepended to the user's message when it is time for their medication.
pub const MEDICINE_NOTICE: &str = "[중요 공지: 지금 약 드실 시간입니다!]";

/// Classifier instructions. The reply format is parsed by
/// [`crate::core::emotion::parse_sentiment_reply`].
pub const SENTIMENT_SYSTEM_PROMPT: &str = "너는 텍스트 감정분석기야. 사용자의 텍스트가 긍정/부정/중립 중 어느 것에 가까운지 판단해. \
결과는 반드시 '감정: [긍정/부정/중립], 이유: [한 문장]'으로 출력해.";

/// `2025년 03월 07일`
pub fn format_korean_date(date: Date) -> String {
    format!(
        "{:04}년 {:02}월 {:02}일",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Today's date at the given offset.
pub fn today(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}

/// Persona for the elder-care companion, anchored to `today`.
pub fn companion_system_prompt(today: Date) -> String {
    format!(
        "너는 어르신과 대화하는 다정한 한국어 챗봇이야. \
항상 공감하고 존중하는 말투를 써. 인사말은 한 번만 자연스럽게 하고 반복하지 마. \
오늘은 {}이야. 실시간 정보는 제공할 수 없으니 양해를 구하고, 가능한 정보 내에서 답변해줘.",
        format_korean_date(today)
    )
}

pub fn companion_user_message(user_input: &str, medicine_time: bool) -> String {
    if medicine_time {
        format!("{MEDICINE_NOTICE} {user_input}")
    } else {
        user_input.to_string()
    }
}

pub fn companion_request(
    user_input: &str,
    medicine_time: bool,
    today: Date,
    max_tokens: u32,
) -> ChatRequest {
    ChatRequest::new(
        companion_system_prompt(today),
        companion_user_message(user_input, medicine_time),
        max_tokens,
    )
}

pub fn sentiment_request(user_input: &str, max_tokens: u32) -> ChatRequest {
    ChatRequest::new(SENTIMENT_SYSTEM_PROMPT, user_input, max_tokens)
}
