//! Rendering raw completion responses into styled HTML.

use anyhow::{Result, anyhow};
use minijinja::{Environment, context};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::model::Snippet;
use crate::infra::config::Config;
use crate::infra::escape::escape;
use crate::infra::highlight::{Highlighter, Language, Palette};

const FENCE: &str = "```";
const HEADING: &str = "###";
const BLOCK_END: &str = "</pre>";

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern must compile"));

/// Scanner state between lines. Lives for a single render call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum RenderState {
    #[default]
    Plain,
    InFence {
        language: String,
    },
}

/// Turns raw response text into markup for a rich-text viewer.
///
/// Rendering is a pure function of the input: each call starts outside any fence and carries
/// nothing over to the next.
pub struct ResponseRenderer {
    highlighter: Highlighter,
    block_start: String,
    env: Environment<'static>,
}

impl ResponseRenderer {
    pub fn new(palette: Palette) -> Result<Self> {
        let block_start = format!(
            "<pre style=\"background-color:{}; color:{}; padding:10px; border: 1px solid {};\">",
            palette.block_background, palette.foreground, palette.block_border
        );
        Ok(Self {
            highlighter: Highlighter::new(palette),
            block_start,
            env: default_environment()?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.render.palette())
    }

    /// Render `raw` line by line into an HTML fragment.
    ///
    /// Fenced blocks become `<pre>` containers with highlighted lines, `###` lines become
    /// headings, `**text**` pairs become bold, everything else a paragraph. A fence left open at
    /// the end of input is closed.
    pub fn render(&self, raw: &str) -> String {
        let (state, mut out) = raw.lines().fold(
            (RenderState::default(), String::new()),
            |(state, mut out), line| {
                let next = self.render_line(state, line, &mut out);
                (next, out)
            },
        );

        if let RenderState::InFence { language } = state {
            tracing::debug!(language = %language, "closing unterminated code fence");
            out.push_str(BLOCK_END);
        }
        out
    }

    /// Render `raw` and wrap it in a complete, palette styled HTML document.
    pub fn render_document(&self, raw: &str) -> Result<String> {
        let body = self.render(raw);
        self.render_template(
            "response_document",
            context! {
                palette => self.highlighter.palette(),
                body => body,
            },
        )
    }

    /// Render a captured snippet as a standalone monospace document, highlighted according to
    /// its file extension.
    pub fn render_snippet(&self, snippet: &Snippet) -> Result<String> {
        let language = Language::from_file_name(&snippet.file_name);
        let code = snippet
            .code
            .lines()
            .map(|line| {
                let escaped = escape(line);
                match language {
                    Some(language) => self.highlighter.highlight_as(language, &escaped),
                    None => escaped,
                }
            })
            .collect::<Vec<_>>()
            .join("\n");

        self.render_template(
            "snippet_document",
            context! {
                palette => self.highlighter.palette(),
                code => code,
            },
        )
    }

    fn render_line(&self, state: RenderState, line: &str, out: &mut String) -> RenderState {
        let trimmed = line.trim();
        match state {
            RenderState::Plain => {
                if let Some(tag) = trimmed.strip_prefix(FENCE) {
                    let language = tag.trim().to_lowercase();
                    tracing::debug!(
                        language = %language,
                        rules = Language::from_tag(&language).map_or("none", |l| l.as_str()),
                        "opening code fence"
                    );
                    out.push_str(&self.block_start);
                    return RenderState::InFence { language };
                }
                render_prose(line, out);
                RenderState::Plain
            }
            RenderState::InFence { language } => {
                if trimmed == FENCE {
                    out.push_str(BLOCK_END);
                    return RenderState::Plain;
                }
                out.push_str(&self.highlighter.highlight(&language, &escape(line)));
                out.push('\n');
                RenderState::InFence { language }
            }
        }
    }

    fn render_template(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(ctx))
            .map_err(|err| anyhow!("failed to render template '{name}': {err}"))
    }
}

fn render_prose(line: &str, out: &mut String) {
    let trimmed = line.trim();
    if let Some(heading) = trimmed.strip_prefix(HEADING) {
        out.push_str(&format!("<h3>{}</h3>", escape(heading.trim())));
    } else if BOLD.is_match(line) {
        let escaped = escape(line);
        let bolded = BOLD.replace_all(&escaped, "<b>${1}</b>");
        out.push_str(&format!("<p>{bolded}</p>"));
    } else {
        out.push_str(&format!("<p>{}</p>", escape(line)));
    }
}

fn default_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template("response_document", RESPONSE_DOCUMENT_TEMPLATE)
        .map_err(|err| anyhow!("failed to register response document template: {err}"))?;
    env.add_template("snippet_document", SNIPPET_DOCUMENT_TEMPLATE)
        .map_err(|err| anyhow!("failed to register snippet document template: {err}"))?;
    Ok(env)
}

const RESPONSE_DOCUMENT_TEMPLATE: &str = r#"<html><body style="font-family: sans-serif; font-size: 12px; background-color: {{ palette.background }}; color: {{ palette.foreground }}; padding: 10px;">{{ body }}</body></html>"#;

const SNIPPET_DOCUMENT_TEMPLATE: &str = r#"<html>
    <body style="font-family: monospace; font-size: 12px; background-color: {{ palette.background }}; color: {{ palette.foreground }};">
        <pre style="margin: 0; padding: 5px;">{{ code }}</pre>
    </body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK_START: &str = "<pre style=\"background-color:#3c3f41; color:#a9b7c6; padding:10px; border: 1px solid #555;\">";

    fn renderer() -> ResponseRenderer {
        ResponseRenderer::new(Palette::default()).expect("renderer")
    }

    #[test]
    fn bash_fence_highlights_keyword() {
        let html = renderer().render("```bash\necho hi\n```");
        assert_eq!(
            html,
            format!("{BLOCK_START}<span style='color:#CC7832'>echo</span> hi\n</pre>")
        );
        assert!(!html.contains("```"));
    }

    #[test]
    fn unterminated_fence_is_closed() {
        let html = renderer().render("```bash\necho hi");
        assert_eq!(
            html,
            format!("{BLOCK_START}<span style='color:#CC7832'>echo</span> hi\n</pre>")
        );
    }

    #[test]
    fn heading_is_escaped() {
        assert_eq!(renderer().render("### Title <x>"), "<h3>Title &lt;x&gt;</h3>");
        assert_eq!(renderer().render("  ###Indented"), "<h3>Indented</h3>");
    }

    #[test]
    fn bold_pairs_are_wrapped_and_escaped() {
        assert_eq!(
            renderer().render("Use **this** & **<that>**"),
            "<p>Use <b>this</b> &amp; <b>&lt;that&gt;</b></p>"
        );
    }

    #[test]
    fn unpaired_bold_marker_is_plain_text() {
        assert_eq!(renderer().render("2 ** 3"), "<p>2 ** 3</p>");
    }

    #[test]
    fn plain_lines_become_paragraphs() {
        assert_eq!(
            renderer().render("a < b\n\nc"),
            "<p>a &lt; b</p><p></p><p>c</p>"
        );
    }

    #[test]
    fn unknown_language_content_is_escaped_only() {
        let html = renderer().render("```python\nif a < b: return\n```");
        assert_eq!(html, format!("{BLOCK_START}if a &lt; b: return\n</pre>"));
    }

    #[test]
    fn fence_tag_is_lowercased() {
        let html = renderer().render("```BASH\npwd\n```");
        assert!(html.contains("<span style='color:#CC7832'>pwd</span>"));
    }

    #[test]
    fn tagged_fence_line_inside_block_is_content() {
        let html = renderer().render("```\n```java\n```");
        assert_eq!(html, format!("{BLOCK_START}```java\n</pre>"));
    }

    #[test]
    fn text_after_block_returns_to_prose() {
        let html = renderer().render("```java\nint x;\n```\n### Next");
        assert!(html.ends_with("</pre><h3>Next</h3>"));
    }

    #[test]
    fn render_is_pure() {
        let renderer = renderer();
        let raw = "### Plan\n```bash\necho $HOME\n";
        assert_eq!(renderer.render(raw), renderer.render(raw));
        assert_eq!(renderer.render("plain"), "<p>plain</p>");
    }

    #[test]
    fn document_wraps_fragment() -> Result<()> {
        let html = renderer().render_document("hello")?;
        assert!(html.starts_with(
            "<html><body style=\"font-family: sans-serif; font-size: 12px; background-color: #2b2b2b;"
        ));
        assert!(html.ends_with("<p>hello</p></body></html>"));
        Ok(())
    }

    #[test]
    fn snippet_document_uses_extension_language() -> Result<()> {
        let snippet = Snippet {
            file_name: "Main.java".into(),
            start_line: 1,
            end_line: 2,
            code: "int a = 1;\nif (a < 2) {}".into(),
        };
        let html = renderer().render_snippet(&snippet)?;
        assert!(html.contains(
            "<pre style=\"margin: 0; padding: 5px;\"><span style='color:#CC7832'>int</span> a = 1;\n\
             <span style='color:#CC7832'>if</span> (a &lt; 2) {}</pre>"
        ));
        Ok(())
    }

    #[test]
    fn snippet_document_without_known_language_is_escaped() -> Result<()> {
        let snippet = Snippet {
            file_name: "notes.txt".into(),
            start_line: 4,
            end_line: 5,
            code: "echo <b>\nls".into(),
        };
        let html = renderer().render_snippet(&snippet)?;
        assert!(html.contains(">echo &lt;b&gt;\nls</pre>"));
        Ok(())
    }
}
