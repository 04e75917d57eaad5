//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::infra::highlight::Palette;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".snipctx/config.toml";

/// Model named in completion requests when no layer sets one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Header placed between the free text and the snippets of an assembled prompt.
pub const DEFAULT_SNIPPET_HEADER: &str = "--- Code Snippets ---";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    #[serde(default)]
    pub prompt: Prompt,
    #[serde(default)]
    pub render: Render,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Defaults {
    #[serde(default)]
    pub model: Option<String>,
}

impl Defaults {
    pub fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Prompt {
    #[serde(default)]
    snippet_header: Option<String>,
}

impl Prompt {
    pub fn snippet_header(&self) -> String {
        self.snippet_header
            .clone()
            .unwrap_or_else(|| DEFAULT_SNIPPET_HEADER.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Render {
    #[serde(default)]
    pub palette: PaletteLayer,
}

impl Render {
    /// Resolve the configured colors, falling back to the built-in palette per field.
    pub fn palette(&self) -> Palette {
        let layer = self.palette.clone();
        let defaults = Palette::default();
        Palette {
            background: layer.background.unwrap_or(defaults.background),
            foreground: layer.foreground.unwrap_or(defaults.foreground),
            comment: layer.comment.unwrap_or(defaults.comment),
            string: layer.string.unwrap_or(defaults.string),
            variable: layer.variable.unwrap_or(defaults.variable),
            keyword: layer.keyword.unwrap_or(defaults.keyword),
            block_background: layer.block_background.unwrap_or(defaults.block_background),
            block_border: layer.block_border.unwrap_or(defaults.block_border),
        }
    }
}

/// Palette colors as written in one config file. Unset fields defer to the layer below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PaletteLayer {
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub foreground: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub string: Option<String>,
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub block_background: Option<String>,
    #[serde(default)]
    pub block_border: Option<String>,
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    model: Option<String>,
    snippet_header: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            model: env::var("SNIPCTX_MODEL").ok(),
            snippet_header: env::var("SNIPCTX_SNIPPET_HEADER").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(model: &str, snippet_header: &str) -> Self {
        Self {
            model: Some(model.to_owned()),
            snippet_header: Some(snippet_header.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            tracing::debug!(path = %global_path.display(), "loading user config");
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            tracing::debug!(path = %workspace_path.display(), "loading workspace config");
            layers.push(Self::from_file(&workspace_path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    fn merge(self, other: Self) -> Self {
        Self {
            defaults: merge_defaults(self.defaults, other.defaults),
            prompt: merge_prompt(self.prompt, other.prompt),
            render: Render {
                palette: merge_palette(self.render.palette, other.render.palette),
            },
        }
    }
}

fn merge_defaults(base: Defaults, overlay: Defaults) -> Defaults {
    Defaults {
        model: overlay.model.or(base.model),
    }
}

fn merge_prompt(mut base: Prompt, overlay: Prompt) -> Prompt {
    if let Some(value) = overlay.snippet_header {
        base.snippet_header = Some(value);
    }
    base
}

fn merge_palette(base: PaletteLayer, overlay: PaletteLayer) -> PaletteLayer {
    PaletteLayer {
        background: overlay.background.or(base.background),
        foreground: overlay.foreground.or(base.foreground),
        comment: overlay.comment.or(base.comment),
        string: overlay.string.or(base.string),
        variable: overlay.variable.or(base.variable),
        keyword: overlay.keyword.or(base.keyword),
        block_background: overlay.block_background.or(base.block_background),
        block_border: overlay.block_border.or(base.block_border),
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("snipctx/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(model) = env.model {
        config.defaults.model = Some(model);
    }
    if let Some(header) = env.snippet_header {
        config.prompt.snippet_header = Some(header);
    }
    config
}
