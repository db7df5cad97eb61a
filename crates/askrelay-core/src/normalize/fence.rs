//! Fenced code block detection.

const FENCE: &str = "```";

/// Body of the first fenced block whose language marker is empty or `json`
/// (any case), trimmed.
///
/// The marker is the run of `[A-Za-z0-9_+-]` right after the opening fence.
/// Blocks tagged with another language are skipped. An opening fence with no
/// closing fence ends the search.
pub(crate) fn json_fence_body(text: &str) -> Option<&str> {
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let marker_len = after_open
            .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+')))
            .unwrap_or(after_open.len());
        let marker = &after_open[..marker_len];
        let after_marker = &after_open[marker_len..];

        let close = after_marker.find(FENCE)?;
        if marker.is_empty() || marker.eq_ignore_ascii_case("json") {
            return Some(after_marker[..close].trim());
        }
        rest = &after_marker[close + FENCE.len()..];
    }

    None
}
