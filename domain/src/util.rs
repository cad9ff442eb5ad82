//! Shared utility functions.

/// Truncate a string to at most `max_bytes` without splitting a UTF-8
/// character.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line preview of user text for log messages.
///
/// Newlines are flattened and an ellipsis marks truncation.
pub fn preview(s: &str, max_bytes: usize) -> String {
    let flat = s.replace(['\n', '\r'], " ");
    let cut = truncate_str(&flat, max_bytes);
    if cut.len() < flat.len() {
        format!("{cut}…")
    } else {
        flat
    }
}
