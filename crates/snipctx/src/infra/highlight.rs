//! Regex based syntax highlighting for code shown inside rendered responses.
//!
//! Each supported language owns an ordered table of rules. The rules run one after another over
//! the same, already escaped, line: comments, then strings, then variables (shell only), then
//! keywords. Later passes see the markup inserted by earlier ones, so a keyword inside a string
//! span gets its own nested span. That behaviour is kept as is.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

const C_FAMILY_KEYWORDS: &[&str] = &[
    "public",
    "class",
    "static",
    "void",
    "int",
    "long",
    "if",
    "else",
    "return",
    "new",
    "private",
    "protected",
    "boolean",
    "String",
    "package",
    "import",
    "override",
    "fun",
    "val",
    "var",
];

const SHELL_KEYWORDS: &[&str] = &[
    "echo", "cd", "ls", "pwd", "rm", "mkdir", "touch", "cat", "sudo", "chmod", "chown", "git",
    "export",
];

static C_FAMILY_RULES: Lazy<Vec<HighlightRule>> = Lazy::new(|| {
    let mut rules = vec![
        HighlightRule::new(TokenClass::Comment, r"//.*"),
        HighlightRule::new(TokenClass::String, r#""(.*?)""#),
    ];
    rules.extend(keyword_rules(C_FAMILY_KEYWORDS));
    rules
});

static SHELL_RULES: Lazy<Vec<HighlightRule>> = Lazy::new(|| {
    let mut rules = vec![
        HighlightRule::new(TokenClass::Comment, r"#.*"),
        HighlightRule::new(TokenClass::String, r#""(.*?)""#),
        HighlightRule::new(TokenClass::Variable, r"\$[A-Za-z_][A-Za-z0-9_]*"),
    ];
    rules.extend(keyword_rules(SHELL_KEYWORDS));
    rules
});

/// Languages with a highlighting table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Language {
    /// Java and Kotlin style sources.
    CFamily,
    /// POSIX shell and bash.
    Shell,
}

impl Language {
    /// Resolve a fence tag such as `java` or `bash`. Matching ignores case.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "java" | "kotlin" | "kt" => Some(Language::CFamily),
            "bash" | "shell" | "sh" => Some(Language::Shell),
            _ => None,
        }
    }

    /// Resolve the language of a snippet from its file name extension.
    pub fn from_file_name(name: &str) -> Option<Self> {
        let extension = Path::new(name).extension()?.to_str()?;
        match extension {
            "java" | "kt" => Some(Language::CFamily),
            "sh" => Some(Language::Shell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::CFamily => "c-family",
            Language::Shell => "shell",
        }
    }

    fn rules(&self) -> &'static [HighlightRule] {
        match self {
            Language::CFamily => C_FAMILY_RULES.as_slice(),
            Language::Shell => SHELL_RULES.as_slice(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenClass {
    Comment,
    String,
    Variable,
    Keyword,
}

#[derive(Debug)]
struct HighlightRule {
    class: TokenClass,
    pattern: Regex,
}

impl HighlightRule {
    fn new(class: TokenClass, pattern: &str) -> Self {
        Self {
            class,
            pattern: Regex::new(pattern).expect("built-in highlight pattern must compile"),
        }
    }
}

fn keyword_rules(keywords: &'static [&'static str]) -> impl Iterator<Item = HighlightRule> {
    keywords.iter().map(|keyword| {
        HighlightRule::new(
            TokenClass::Keyword,
            &format!(r"\b{}\b", regex::escape(keyword)),
        )
    })
}

/// Colors used by highlighted spans and the surrounding documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default = "Palette::default_background")]
    pub background: String,
    #[serde(default = "Palette::default_foreground")]
    pub foreground: String,
    #[serde(default = "Palette::default_comment")]
    pub comment: String,
    #[serde(default = "Palette::default_string")]
    pub string: String,
    #[serde(default = "Palette::default_variable")]
    pub variable: String,
    #[serde(default = "Palette::default_keyword")]
    pub keyword: String,
    #[serde(default = "Palette::default_block_background")]
    pub block_background: String,
    #[serde(default = "Palette::default_block_border")]
    pub block_border: String,
}

impl Palette {
    pub(crate) fn default_background() -> String {
        "#2b2b2b".into()
    }

    pub(crate) fn default_foreground() -> String {
        "#a9b7c6".into()
    }

    pub(crate) fn default_comment() -> String {
        "#808080".into()
    }

    pub(crate) fn default_string() -> String {
        "#6A8759".into()
    }

    pub(crate) fn default_variable() -> String {
        "#9876AA".into()
    }

    pub(crate) fn default_keyword() -> String {
        "#CC7832".into()
    }

    pub(crate) fn default_block_background() -> String {
        "#3c3f41".into()
    }

    pub(crate) fn default_block_border() -> String {
        "#555".into()
    }

    fn color_for(&self, class: TokenClass) -> &str {
        match class {
            TokenClass::Comment => &self.comment,
            TokenClass::String => &self.string,
            TokenClass::Variable => &self.variable,
            TokenClass::Keyword => &self.keyword,
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Self::default_background(),
            foreground: Self::default_foreground(),
            comment: Self::default_comment(),
            string: Self::default_string(),
            variable: Self::default_variable(),
            keyword: Self::default_keyword(),
            block_background: Self::default_block_background(),
            block_border: Self::default_block_border(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Highlighter {
    palette: Palette,
}

impl Highlighter {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Highlight a single escaped line for the language named by a fence tag.
    ///
    /// Unknown or empty tags return the line unchanged.
    pub fn highlight(&self, tag: &str, line: &str) -> String {
        match Language::from_tag(tag) {
            Some(language) => self.highlight_as(language, line),
            None => {
                tracing::trace!(tag, "no highlight rules for language");
                line.to_string()
            }
        }
    }

    /// Highlight a single escaped line with the rules of `language`.
    pub fn highlight_as(&self, language: Language, line: &str) -> String {
        language
            .rules()
            .iter()
            .fold(line.to_string(), |text, rule| self.apply_rule(rule, &text))
    }

    fn apply_rule(&self, rule: &HighlightRule, text: &str) -> String {
        let color = self.palette.color_for(rule.class);
        rule.pattern
            .replace_all(text, |caps: &Captures| match rule.class {
                TokenClass::String => {
                    format!("<span style='color:{color}'>&quot;{}&quot;</span>", &caps[1])
                }
                _ => format!("<span style='color:{color}'>{}</span>", &caps[0]),
            })
            .into_owned()
    }
}
