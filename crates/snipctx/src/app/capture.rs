//! Locating pasted code inside the source document it came from.

use crate::app::selection::SnippetSet;
use crate::domain::errors::DomainError;
use crate::domain::model::{Snippet, SnippetId};

/// Match pasted text against the document it was copied from.
///
/// Returns `Ok(None)` when there is nothing to track: the paste is blank, spans a single line,
/// or does not occur verbatim in `document`. The first occurrence wins. Only an empty file name
/// is rejected as invalid input.
pub fn capture(
    document: &str,
    pasted: &str,
    file_name: &str,
) -> Result<Option<Snippet>, DomainError> {
    if file_name.trim().is_empty() {
        return Err(DomainError::invalid("snippet file name must not be empty"));
    }

    let code = pasted.trim();
    if code.is_empty() || !code.contains('\n') {
        tracing::debug!(file = file_name, "paste is not a multi-line snippet");
        return Ok(None);
    }

    let Some(start) = document.find(code) else {
        tracing::debug!(file = file_name, "pasted text not found in document");
        return Ok(None);
    };
    let end = start + code.len();

    let snippet = Snippet {
        file_name: file_name.to_string(),
        start_line: line_at(document, start),
        end_line: line_at(document, end),
        code: code.to_string(),
    };
    tracing::debug!(
        file = file_name,
        start_line = snippet.start_line,
        end_line = snippet.end_line,
        "captured snippet"
    );
    Ok(Some(snippet))
}

/// Capture a paste and append it to `set` when it matches.
pub fn track(
    set: &mut SnippetSet,
    document: &str,
    pasted: &str,
    file_name: &str,
) -> Result<Option<SnippetId>, DomainError> {
    Ok(capture(document, pasted, file_name)?.map(|snippet| set.push(snippet)))
}

/// Discard a tracked snippet. Unknown ids are ignored.
pub fn remove_from_set(set: &mut SnippetSet, id: SnippetId) -> bool {
    let removed = set.remove(id);
    tracing::debug!(id = %id, removed, "removing snippet");
    removed
}

/// 1-based line containing `offset`: one more than the newlines before it.
fn line_at(document: &str, offset: usize) -> usize {
    document[..offset].matches('\n').count() + 1
}
