use crate::record::UNKNOWN;

/// Collapse raw cell/paragraph text to a single trimmed line.
/// Empty or whitespace-only input maps to the `"unknown"` sentinel.
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        UNKNOWN.to_string()
    } else {
        collapsed
    }
}

/// Like [`normalize`] but keeps empty input as an empty string. Used for
/// detail text, where absence is not the same as "unknown".
pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
