//! Sentence-level shortening of replies before they are spoken.

/// Characters that end a sentence.
const TERMINATORS: &[char] = &['.', '!', '?', '。', '！', '？', '…'];

/// Split `text` into sentences, keeping each terminator run attached.
///
/// A sentence ends at a run of terminators followed by whitespace or the end
/// of the text, so decimals such as `3.5` and ellipses stay intact.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !TERMINATORS.contains(&c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if TERMINATORS.contains(&next) {
                end = j + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let at_boundary = chars.peek().is_none_or(|&(_, next)| next.is_whitespace());
        if at_boundary {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// Keep at most `max` sentences of `text`, joined by single spaces.
///
/// Text without any terminator is a single sentence and is returned trimmed.
pub fn limit_sentences(text: &str, max: usize) -> String {
    split_sentences(text)
        .into_iter()
        .take(max)
        .collect::<Vec<_>>()
        .join(" ")
}
