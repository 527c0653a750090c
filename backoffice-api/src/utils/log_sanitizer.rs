//! Log sanitization utilities
//!
//! Keeps bearer tokens and oversized response bodies (notice content, popup HTML)
//! out of debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading token characters kept when masking.
const TOKEN_VISIBLE_PREFIX: usize = 6;

/// Largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Truncate a response or request body for logging.
///
/// Bodies within the limit are returned unchanged; longer ones keep their first
/// `TRUNCATE_LIMIT` bytes (on a char boundary) followed by the total size.
pub(crate) fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask an access token so only a short prefix is visible.
pub(crate) fn mask_token(token: &str) -> String {
    let visible = floor_char_boundary(token, TOKEN_VISIBLE_PREFIX);
    if visible >= token.len() {
        "***".to_string()
    } else {
        format!("{}***", &token[..visible])
    }
}
