//! Assembling the outbound prompt from free text and tracked snippets.

use crate::domain::model::Snippet;
use crate::infra::config::{Config, DEFAULT_SNIPPET_HEADER};

/// Joins the user's instruction with the provenance-annotated snippets.
#[derive(Debug, Clone)]
pub struct PromptAssembler {
    header: String,
}

impl Default for PromptAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_SNIPPET_HEADER)
    }
}

impl PromptAssembler {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.prompt.snippet_header())
    }

    /// Build the prompt text.
    ///
    /// Without snippets this is the trimmed free text. Otherwise the section header follows,
    /// then each snippet in ascending start line order (ties keep their given order), preceded
    /// by a `// From {file} (lines {start}-{end})` line. Sections are separated by a blank line.
    pub fn assemble<'a>(
        &self,
        free_text: &str,
        snippets: impl IntoIterator<Item = &'a Snippet>,
    ) -> String {
        let mut ordered: Vec<&Snippet> = snippets.into_iter().collect();
        let free_text = free_text.trim();
        if ordered.is_empty() {
            return free_text.to_string();
        }
        ordered.sort_by_key(|snippet| snippet.start_line);

        let mut sections = Vec::with_capacity(ordered.len() + 2);
        if !free_text.is_empty() {
            sections.push(free_text.to_string());
        }
        sections.push(self.header.clone());
        sections.extend(
            ordered
                .iter()
                .map(|snippet| format!("// From {}\n{}", snippet.provenance(), snippet.code)),
        );
        sections.join("\n\n")
    }
}
