//! Session state shared by the paste, ask, and accept/reject flows.

use crate::app::apply::plan_edit;
use crate::app::capture;
use crate::app::extract::extract_code;
use crate::app::prompt::PromptAssembler;
use crate::app::selection::SnippetSet;
use crate::domain::errors::DomainError;
use crate::domain::model::SnippetId;

/// Caller-owned session: the active snippets and the last response received.
///
/// Nothing here is global. A UI keeps one session per tool window and confines it to a single
/// thread or guards it with one lock.
#[derive(Debug, Default, Clone)]
pub struct ChatSession {
    snippets: SnippetSet,
    last_response: Option<String>,
    assembler: PromptAssembler,
}

impl ChatSession {
    pub fn new(assembler: PromptAssembler) -> Self {
        Self {
            snippets: SnippetSet::new(),
            last_response: None,
            assembler,
        }
    }

    pub fn snippets(&self) -> &SnippetSet {
        &self.snippets
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    /// Track a paste made while `document` was the active editor content.
    pub fn on_paste(
        &mut self,
        document: &str,
        pasted: &str,
        file_name: &str,
    ) -> Result<Option<SnippetId>, DomainError> {
        capture::track(&mut self.snippets, document, pasted, file_name)
    }

    pub fn remove(&mut self, id: SnippetId) -> bool {
        capture::remove_from_set(&mut self.snippets, id)
    }

    /// Assemble the prompt to send. Returns `None` when there is nothing to ask.
    pub fn compose(&self, free_text: &str) -> Option<String> {
        let prompt = self.assembler.assemble(free_text, self.snippets.ordered());
        (!prompt.trim().is_empty()).then_some(prompt)
    }

    pub fn record_response(&mut self, raw: impl Into<String>) {
        self.last_response = Some(raw.into());
    }

    /// Apply the code of the last response to `document`.
    ///
    /// Returns the edited document, or `None` when there was no response or it carried no code.
    /// On success the response and all snippets are cleared; on error the session is unchanged.
    pub fn accept(
        &mut self,
        document: &str,
        caret: usize,
    ) -> Result<Option<String>, DomainError> {
        let Some(raw) = self.last_response.as_deref() else {
            return Ok(None);
        };

        let code = extract_code(raw);
        let edited = if code.is_empty() {
            None
        } else {
            let edit = plan_edit(document, self.snippets.ordered(), caret)?;
            Some(edit.apply(document, &code)?)
        };

        self.last_response = None;
        self.snippets.clear();
        Ok(edited)
    }

    /// Drop the last response, keeping the tracked snippets.
    pub fn reject(&mut self) {
        self.last_response = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = "class A {\n    int a;\n    int b;\n}\n";

    #[test]
    fn paste_compose_accept_round() {
        let mut session = ChatSession::default();
        let id = session
            .on_paste(DOCUMENT, "int a;\n    int b;", "A.java")
            .unwrap()
            .expect("tracked");
        assert_eq!(session.snippets().get(id).map(|s| s.end_line), Some(3));

        let prompt = session.compose("rename fields").unwrap();
        assert!(prompt.contains("// From A.java (lines 2-3)"));

        session.record_response("Sure:\n```java\n    int x;\n    int y;\n```");
        let edited = session.accept(DOCUMENT, 0).unwrap();
        assert_eq!(
            edited.as_deref(),
            Some("class A {\nint x;\n    int y;\n}\n")
        );
        assert!(session.snippets().is_empty());
        assert!(session.last_response().is_none());
    }

    #[test]
    fn accept_without_snippets_inserts_at_caret() {
        let mut session = ChatSession::default();
        session.record_response("```bash\necho hi\n```");
        let edited = session.accept("ab", 1).unwrap();
        assert_eq!(edited.as_deref(), Some("aecho hib"));
    }

    #[test]
    fn accept_without_code_clears_state() {
        let mut session = ChatSession::default();
        session.on_paste("x\ny\n", "x\ny", "f.sh").unwrap();
        session.record_response("No code needed.");
        assert_eq!(session.accept("x\ny\n", 0).unwrap(), None);
        assert!(session.snippets().is_empty());
        assert!(session.last_response().is_none());
    }

    #[test]
    fn accept_error_keeps_state() {
        let mut session = ChatSession::default();
        session.record_response("```\ncode\n```");
        assert!(session.accept("ab", 10).is_err());
        assert!(session.last_response().is_some());
    }

    #[test]
    fn reject_keeps_snippets() {
        let mut session = ChatSession::default();
        session.on_paste("x\ny\n", "x\ny", "f.sh").unwrap();
        session.record_response("anything");
        session.reject();
        assert!(session.last_response().is_none());
        assert_eq!(session.snippets().len(), 1);
        assert_eq!(session.accept("x\ny\n", 0).unwrap(), None);
    }

    #[test]
    fn blank_prompt_is_not_composed() {
        let session = ChatSession::default();
        assert!(session.compose("   ").is_none());
        assert_eq!(session.compose(" hi ").as_deref(), Some("hi"));
    }

    #[test]
    fn removed_snippet_leaves_prompt() {
        let mut session = ChatSession::default();
        let id = session
            .on_paste("a\nb\n", "a\nb", "f.sh")
            .unwrap()
            .expect("tracked");
        assert!(session.remove(id));
        assert_eq!(session.compose("q").as_deref(), Some("q"));
    }
}
