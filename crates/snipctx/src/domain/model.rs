//! Domain models for captured snippets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// A piece of code pasted by the user, addressed by the file and line range it was found in.
///
/// The code is a snapshot taken at capture time; later edits to the source document do not
/// update it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub file_name: String,
    /// First line of the match, 1-based and inclusive.
    pub start_line: usize,
    /// Last line of the match, 1-based and inclusive.
    pub end_line: usize,
    pub code: String,
}

impl Snippet {
    /// Human readable provenance, e.g. `Main.java (lines 3-7)`.
    pub fn provenance(&self) -> String {
        format!(
            "{} (lines {}-{})",
            self.file_name, self.start_line, self.end_line
        )
    }

    /// Check the invariants a snippet built outside capture must hold: a file name and a
    /// non-empty, 1-based line range.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.file_name.trim().is_empty() {
            return Err(DomainError::invalid("snippet file name must not be empty"));
        }
        if self.start_line == 0 {
            return Err(DomainError::invalid("snippet lines are 1-based"));
        }
        if self.end_line < self.start_line {
            return Err(DomainError::invalid(format!(
                "snippet ends at line {} before it starts at line {}",
                self.end_line, self.start_line
            )));
        }
        Ok(())
    }
}

/// Identity of a snippet inside an active set. Two captures of identical code receive distinct
/// ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnippetId(pub(crate) u64);

impl fmt::Display for SnippetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedSnippet {
    pub id: SnippetId,
    pub snippet: Snippet,
}
