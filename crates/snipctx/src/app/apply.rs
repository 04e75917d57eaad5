//! Planning where extracted code is written back into a document.

use std::ops::Range;

use crate::domain::errors::DomainError;
use crate::domain::model::Snippet;

/// A single edit against a document snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentEdit {
    /// Replace the byte range spanned by the tracked snippets.
    Replace { range: Range<usize> },
    /// Insert at the caret.
    Insert { offset: usize },
}

impl DocumentEdit {
    /// Apply the edit to `document`, returning the new text.
    pub fn apply(&self, document: &str, code: &str) -> Result<String, DomainError> {
        let mut edited = document.to_string();
        match self {
            DocumentEdit::Replace { range } => {
                if document.get(range.clone()).is_none() {
                    return Err(DomainError::invalid(format!(
                        "replacement range {}..{} is outside the document",
                        range.start, range.end
                    )));
                }
                edited.replace_range(range.clone(), code);
            }
            DocumentEdit::Insert { offset } => {
                if !document.is_char_boundary(*offset) {
                    return Err(DomainError::invalid(format!(
                        "insertion offset {offset} is outside the document"
                    )));
                }
                edited.insert_str(*offset, code);
            }
        }
        Ok(edited)
    }
}

/// Decide how code from a response lands in `document`.
///
/// With snippets, the edit replaces everything from the start of the earliest snippet's first
/// line to the end of the last line any snippet covers, excluding the line terminator. Without
/// snippets the code is inserted at `caret`.
pub fn plan_edit<'a>(
    document: &str,
    snippets: impl IntoIterator<Item = &'a Snippet>,
    caret: usize,
) -> Result<DocumentEdit, DomainError> {
    let mut snippets = snippets.into_iter().peekable();
    if snippets.peek().is_none() {
        if !document.is_char_boundary(caret) {
            return Err(DomainError::invalid(format!(
                "caret offset {caret} is outside the document"
            )));
        }
        tracing::debug!(caret, "planning insertion at caret");
        return Ok(DocumentEdit::Insert { offset: caret });
    }

    let (first_line, last_line) = snippets.fold((usize::MAX, 0), |(first, last), snippet| {
        (first.min(snippet.start_line), last.max(snippet.end_line))
    });

    let lines = line_spans(document);
    let start = line_span(&lines, first_line)?.start;
    let end = line_span(&lines, last_line)?.end;
    tracing::debug!(first_line, last_line, "planning snippet replacement");
    Ok(DocumentEdit::Replace { range: start..end })
}

/// Byte spans of each line, without terminators.
fn line_spans(document: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0;
    for (index, _) in document.match_indices('\n') {
        spans.push(start..index);
        start = index + 1;
    }
    spans.push(start..document.len());
    spans
}

fn line_span(lines: &[Range<usize>], line: usize) -> Result<Range<usize>, DomainError> {
    line.checked_sub(1)
        .and_then(|index| lines.get(index))
        .cloned()
        .ok_or_else(|| {
            DomainError::invalid(format!(
                "line {line} is outside the document ({} lines)",
                lines.len()
            ))
        })
}
