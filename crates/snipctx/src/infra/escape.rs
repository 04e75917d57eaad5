//! Minimal HTML entity escaping.

/// Escape `&`, `<` and `>` so raw text can be embedded in markup.
///
/// Ampersands are replaced first so the entities inserted for `<` and `>` are not escaped again.
/// Applying this twice corrupts the text, so raw text must be escaped exactly once before any
/// highlighting markup is layered on top.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
