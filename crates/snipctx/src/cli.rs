//! Command line front end over the snippet and response pipeline.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::app::capture::capture;
use crate::app::extract::extract_code;
use crate::app::prompt::PromptAssembler;
use crate::app::render::ResponseRenderer;
use crate::app::request::CompletionRequest;
use crate::domain::model::Snippet;
use crate::infra::config::Config;

#[derive(Debug, Parser)]
#[command(name = "snipctx", author, version, about = "Track pasted code snippets and render model responses", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render a raw response as HTML.
    Render {
        /// Wrap the output in a complete HTML document.
        #[arg(long)]
        document: bool,
        /// Response file; reads stdin when omitted.
        input: Option<PathBuf>,
    },
    /// Print the code of every fenced block in a response.
    Extract {
        /// Response file; reads stdin when omitted.
        input: Option<PathBuf>,
    },
    /// Locate pasted text in a document and print the snippet as JSON.
    Capture {
        /// Document the text was copied from.
        #[arg(long)]
        document: PathBuf,
        /// File name recorded on the snippet. Defaults to the document's file name.
        #[arg(long)]
        name: Option<String>,
        /// Pasted text file; reads stdin when omitted.
        paste: Option<PathBuf>,
    },
    /// Assemble a prompt from free text and a JSON array of snippets.
    Prompt {
        #[arg(long)]
        text: String,
        #[arg(long)]
        snippets: Option<PathBuf>,
    },
    /// Print the chat completion request body for a prompt.
    Request {
        #[arg(long)]
        text: String,
        #[arg(long)]
        snippets: Option<PathBuf>,
        /// Overrides the configured model.
        #[arg(long)]
        model: Option<String>,
    },
    /// Generate shell completions.
    Completions { shell: Shell },
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Command::Render { document, input } => {
            let raw = read_input(input.as_deref())?;
            let renderer = ResponseRenderer::from_config(&config)?;
            let html = if document {
                renderer.render_document(&raw)?
            } else {
                renderer.render(&raw)
            };
            writeln!(stdout, "{html}")?;
        }
        Command::Extract { input } => {
            let raw = read_input(input.as_deref())?;
            writeln!(stdout, "{}", extract_code(&raw))?;
        }
        Command::Capture {
            document,
            name,
            paste,
        } => {
            let text = fs::read_to_string(&document)
                .with_context(|| format!("failed to read document {}", document.display()))?;
            let file_name = match name {
                Some(name) => name,
                None => document_file_name(&document)?,
            };
            let pasted = read_input(paste.as_deref())?;
            let snippet = capture(&text, &pasted, &file_name)?;
            if snippet.is_none() {
                tracing::info!(file = %file_name, "nothing to track");
            }
            writeln!(stdout, "{}", serde_json::to_string_pretty(&snippet)?)?;
        }
        Command::Prompt { text, snippets } => {
            let snippets = load_snippets(snippets.as_deref())?;
            let prompt = PromptAssembler::from_config(&config).assemble(&text, &snippets);
            writeln!(stdout, "{prompt}")?;
        }
        Command::Request {
            text,
            snippets,
            model,
        } => {
            let snippets = load_snippets(snippets.as_deref())?;
            let prompt = PromptAssembler::from_config(&config).assemble(&text, &snippets);
            if prompt.trim().is_empty() {
                return Err(anyhow!("refusing to build a request for an empty prompt"));
            }
            let mut request = CompletionRequest::from_config(&config, prompt);
            if let Some(model) = model {
                request.model = model;
            }
            writeln!(stdout, "{}", request.to_json()?)?;
        }
        Command::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "snipctx", &mut stdout);
        }
    }

    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read input file {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin as UTF-8 text")?;
            Ok(buffer)
        }
    }
}

fn load_snippets(path: Option<&Path>) -> Result<Vec<Snippet>> {
    let Some(path) = path else {
        return Ok(Vec::new());
    };
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read snippets from {}", path.display()))?;
    let snippets: Vec<Snippet> = serde_json::from_str(&data)
        .with_context(|| format!("invalid snippet JSON in {}", path.display()))?;
    for (index, snippet) in snippets.iter().enumerate() {
        snippet
            .validate()
            .with_context(|| format!("snippet {index} in {} is malformed", path.display()))?;
    }
    Ok(snippets)
}

fn document_file_name(path: &Path) -> Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("document path {} has no file name", path.display()))
}
