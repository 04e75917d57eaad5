//! The active set of captured snippets.

use crate::domain::model::{Snippet, SnippetId, TrackedSnippet};

/// Ordered, session-owned collection of captured snippets.
///
/// Entries are unique by identity, not by value: capturing the same code twice yields two
/// entries with different ids. Snippets are never mutated once added.
#[derive(Debug, Default, Clone)]
pub struct SnippetSet {
    entries: Vec<TrackedSnippet>,
    next_id: u64,
}

impl SnippetSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of tracked snippets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether any snippets exist.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: SnippetId) -> Option<&Snippet> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.snippet)
    }

    /// Append a snippet and return its identity.
    pub fn push(&mut self, snippet: Snippet) -> SnippetId {
        let id = SnippetId(self.next_id);
        self.next_id += 1;
        self.entries.push(TrackedSnippet { id, snippet });
        id
    }

    /// Remove a snippet by identity. Returns `false` when it was not tracked.
    pub fn remove(&mut self, id: SnippetId) -> bool {
        let original_len = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != original_len
    }

    /// Remove all snippets. Ids are not reused afterwards.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snippets sorted by start line. Ties keep insertion order.
    pub fn ordered(&self) -> Vec<&Snippet> {
        let mut snippets: Vec<&Snippet> =
            self.entries.iter().map(|entry| &entry.snippet).collect();
        snippets.sort_by_key(|snippet| snippet.start_line);
        snippets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(start_line: usize, code: &str) -> Snippet {
        Snippet {
            file_name: "Main.java".into(),
            start_line,
            end_line: start_line + 1,
            code: code.into(),
        }
    }

    #[test]
    fn identical_snippets_are_distinct_entries() {
        let mut set = SnippetSet::new();
        let first = set.push(snippet(1, "a\nb"));
        let second = set.push(snippet(1, "a\nb"));

        assert_ne!(first, second);
        assert_eq!(set.len(), 2);

        assert!(set.remove(first));
        assert_eq!(set.len(), 1);
        assert!(set.get(second).is_some());
        assert!(set.get(first).is_none());
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let mut set = SnippetSet::new();
        let id = set.push(snippet(4, "x\ny"));
        assert!(set.remove(id));
        assert!(!set.remove(id));
        assert!(set.is_empty());
    }

    #[test]
    fn ordered_sorts_by_start_line_stably() {
        let mut set = SnippetSet::new();
        set.push(snippet(10, "late"));
        set.push(snippet(3, "early"));
        set.push(snippet(10, "late again"));

        let codes: Vec<&str> = set.ordered().iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["early", "late", "late again"]);
    }

    #[test]
    fn ids_are_not_reused_after_clear() {
        let mut set = SnippetSet::new();
        let before = set.push(snippet(1, "a\nb"));
        set.clear();
        let after = set.push(snippet(1, "a\nb"));
        assert_ne!(before, after);
    }
}
