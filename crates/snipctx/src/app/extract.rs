//! Pulling plain code out of fenced blocks in a raw response.

const FENCE: &str = "```";

/// Concatenate the content of every fenced block in `raw`, in order of appearance.
///
/// Any line whose trimmed form starts with a fence toggles block state, so language tags are
/// ignored. Lines are copied verbatim without escaping. Blocks with no content are skipped, the
/// rest are joined by a blank line and the result is trimmed. An unterminated trailing block still contributes its content.
pub fn extract_code(raw: &str) -> String {
    let mut blocks: Vec<String> = Vec::new();
    let mut current: Option<Vec<&str>> = None;

    for line in raw.lines() {
        if line.trim().starts_with(FENCE) {
            match current.take() {
                Some(lines) => blocks.push(lines.join("\n")),
                None => current = Some(Vec::new()),
            }
        } else if let Some(lines) = current.as_mut() {
            lines.push(line);
        }
    }

    if let Some(lines) = current {
        tracing::debug!(lines = lines.len(), "keeping unterminated code block");
        blocks.push(lines.join("\n"));
    }

    blocks.retain(|block| !block.trim().is_empty());
    blocks.join("\n\n").trim().to_string()
}
