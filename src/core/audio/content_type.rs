//! Mapping from declared media types to the suffix used for temporary storage.
//!
//! The suffix matters only to the transcoder, which sniffs the container but
//! uses the extension as a hint for raw streams (AAC/ADTS, AMR).

use std::path::Path;

/// Suffix used when neither the media type nor the filename is recognized.
pub const DEFAULT_SUFFIX: &str = "wav";

/// Suffixes accepted from a filename when the media type is absent or unknown.
pub const ALLOWED_SUFFIXES: &[&str] = &[
    "wav", "mp3", "m4a", "mp4", "aac", "webm", "ogg", "oga", "opus", "flac", "3gp", "amr", "mov",
];

/// Media type (lowercase, parameters stripped) to canonical suffix.
const MEDIA_TYPE_SUFFIXES: &[(&str, &str)] = &[
    ("audio/wav", "wav"),
    ("audio/x-wav", "wav"),
    ("audio/wave", "wav"),
    ("audio/vnd.wave", "wav"),
    ("audio/mpeg", "mp3"),
    ("audio/mp3", "mp3"),
    ("audio/mp4", "m4a"),
    ("audio/m4a", "m4a"),
    ("audio/x-m4a", "m4a"),
    ("audio/aac", "aac"),
    ("audio/x-aac", "aac"),
    ("audio/webm", "webm"),
    ("video/webm", "webm"),
    ("audio/ogg", "ogg"),
    ("audio/opus", "ogg"),
    ("audio/flac", "flac"),
    ("audio/x-flac", "flac"),
    ("audio/3gpp", "3gp"),
    ("video/3gpp", "3gp"),
    ("audio/amr", "amr"),
    ("video/mp4", "mp4"),
    ("video/quicktime", "mov"),
];

/// Generic binary types some clients send for any file.
const GENERIC_MEDIA_TYPES: &[&str] = &["application/octet-stream", "binary/octet-stream"];

/// Strip parameters (`; codecs=opus`) and normalize case.
fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn table_suffix(essence: &str) -> Option<&'static str> {
    MEDIA_TYPE_SUFFIXES
        .iter()
        .find(|(mt, _)| *mt == essence)
        .map(|(_, suffix)| *suffix)
}

fn filename_suffix(filename: &str) -> Option<&'static str> {
    let ext = Path::new(filename)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();
    ALLOWED_SUFFIXES.iter().copied().find(|s| *s == ext)
}

/// Resolve the storage suffix for an upload.
///
/// Tries the media type table first, then the filename extension (if it is in
/// [`ALLOWED_SUFFIXES`]), then falls back to [`DEFAULT_SUFFIX`]. Never fails.
pub fn resolve_suffix(media_type: Option<&str>, filename: Option<&str>) -> &'static str {
    media_type
        .map(essence)
        .and_then(|mt| table_suffix(&mt))
        .or_else(|| filename.and_then(filename_suffix))
        .unwrap_or(DEFAULT_SUFFIX)
}

/// Whether a declared media type may enter the pipeline.
///
/// Absent types, generic binary types, any `audio/*` or `video/*` type, and
/// every type in the resolver table are accepted. Anything else (`text/plain`,
/// `image/png`) is rejected before touching disk.
pub fn is_supported_media_type(media_type: Option<&str>) -> bool {
    let Some(raw) = media_type else {
        return true;
    };
    let mt = essence(raw);
    if mt.is_empty() {
        return true;
    }
    table_suffix(&mt).is_some()
        || GENERIC_MEDIA_TYPES.contains(&mt.as_str())
        || mt.starts_with("audio/")
        || mt.starts_with("video/")
}
