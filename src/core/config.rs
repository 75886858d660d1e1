//! Configuration for template resolution and compilation.
//!
//! [`TemplateSettings`] is the runtime configuration shared by the source heuristic,
//! the comment-tag stripper, the resolution engine and the compilers. [`Config`] is
//! the on-disk TOML form read by the CLI, which also selects the template engine.
//!
//! # Example
//!
//! ```toml
//! engine = "minijinja"
//!
//! [templates]
//! variable = "data"
//! unwrap_comment_tag = true
//! retention = "release"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Default variable name templates bind their render data to
pub const DEFAULT_VARIABLE: &str = "data";

/// Opening and closing markers of one tag kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPair {
    pub open: String,
    pub close: String,
}

impl TagPair {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// Both markers are non-empty
    pub fn is_complete(&self) -> bool {
        !self.open.is_empty() && !self.close.is_empty()
    }
}

/// What happens to a source entry once it has been compiled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetentionPolicy {
    /// Keep the raw source next to the compiled template
    #[default]
    Retain,
    /// Drop the raw source after compilation; the compiled entry suffices
    Release,
}

/// How the element id prefix is removed when normalizing identifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrefixMatch {
    /// Remove the first occurrence of the prefix wherever it appears
    #[default]
    FirstOccurrence,
    /// Remove the prefix only when the identifier starts with it
    Leading,
}

/// Runtime settings for template resolution and compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    /// Markers for code blocks that are evaluated but not printed
    pub evaluate: TagPair,
    /// Markers for expressions printed verbatim
    pub interpolate: TagPair,
    /// Markers for expressions printed HTML-escaped
    pub escape: TagPair,
    /// Variable name the template expects its data bound to
    pub variable: Option<String>,
    /// Unwrap `<!-- ... -->` around template code found in a host document
    pub unwrap_comment_tag: bool,
    /// Whether source entries survive compilation
    pub retention: RetentionPolicy,
    /// Emit a diagnostic when `add` replaces an existing entry
    pub warn_on_overwrite: bool,
    /// Element id prefix stripping behavior
    pub prefix_match: PrefixMatch,
}

impl Default for TemplateSettings {
    fn default() -> Self {
        Self {
            evaluate: TagPair::new("<%", "%>"),
            interpolate: TagPair::new("<%=", "%>"),
            escape: TagPair::new("<%-", "%>"),
            variable: Some(DEFAULT_VARIABLE.to_string()),
            unwrap_comment_tag: false,
            retention: RetentionPolicy::default(),
            warn_on_overwrite: true,
            prefix_match: PrefixMatch::default(),
        }
    }
}

impl TemplateSettings {
    /// Settings using Tera's `{% %}` and `{{ }}` markers
    pub fn tera() -> Self {
        Self {
            evaluate: TagPair::new("{%", "%}"),
            interpolate: TagPair::new("{{", "}}"),
            escape: TagPair::new("{{", "}}"),
            ..Self::default()
        }
    }

    /// All configured tag kinds, evaluate first
    pub fn tag_pairs(&self) -> [&TagPair; 3] {
        [&self.evaluate, &self.interpolate, &self.escape]
    }

    /// Reject settings a compiler cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.tag_pairs().iter().all(|pair| pair.is_complete()) {
            Ok(())
        } else {
            Err(Error::config("tag markers must not be empty"))
        }
    }

    pub fn with_variable(mut self, variable: Option<&str>) -> Self {
        self.variable = variable.map(str::to_string);
        self
    }

    pub fn with_unwrap_comment_tag(mut self, unwrap: bool) -> Self {
        self.unwrap_comment_tag = unwrap;
        self
    }

    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self
    }

    pub fn with_prefix_match(mut self, prefix_match: PrefixMatch) -> Self {
        self.prefix_match = prefix_match;
        self
    }
}

/// Template engine used to compile sources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// MiniJinja with `<% %>` style markers
    #[default]
    #[serde(rename = "minijinja")]
    #[value(name = "minijinja")]
    MiniJinja,
    /// Tera engine
    Tera,
}

impl EngineKind {
    /// Default settings matching this engine's tag markers
    pub fn default_settings(self) -> TemplateSettings {
        match self {
            EngineKind::MiniJinja => TemplateSettings::default(),
            EngineKind::Tera => TemplateSettings::tera(),
        }
    }
}

/// `[templates]` table of the configuration file; unset fields fall back to the engine defaults
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TemplatesSection {
    evaluate: Option<TagPair>,
    interpolate: Option<TagPair>,
    escape: Option<TagPair>,
    variable: Option<String>,
    /// Disables the variable requirement
    #[serde(default)]
    no_variable: bool,
    unwrap_comment_tag: Option<bool>,
    retention: Option<RetentionPolicy>,
    warn_on_overwrite: Option<bool>,
    prefix_match: Option<PrefixMatch>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    engine: EngineKind,
    #[serde(default)]
    templates: TemplatesSection,
}

/// Configuration file contents resolved against engine defaults
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub engine: EngineKind,
    pub templates: TemplateSettings,
}

impl Config {
    /// Default configuration for an engine
    pub fn for_engine(engine: EngineKind) -> Self {
        Self {
            engine,
            templates: engine.default_settings(),
        }
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with_engine(content, None)
    }

    /// Parse configuration from a TOML string, with `engine` taking precedence over the
    /// file's `engine` key. Marker defaults follow the resulting engine.
    pub fn from_toml_str_with_engine(content: &str, engine: Option<EngineKind>) -> Result<Self> {
        let file: ConfigFile = toml::from_str(content)?;
        let engine = engine.unwrap_or(file.engine);
        let section = file.templates;

        if section.no_variable && section.variable.is_some() {
            return Err(Error::config(
                "`variable` and `no_variable` cannot both be set",
            ));
        }

        let mut templates = engine.default_settings();
        if let Some(pair) = section.evaluate {
            templates.evaluate = pair;
        }
        if let Some(pair) = section.interpolate {
            templates.interpolate = pair;
        }
        if let Some(pair) = section.escape {
            templates.escape = pair;
        }
        if section.no_variable {
            templates.variable = None;
        } else if let Some(variable) = section.variable {
            templates.variable = Some(variable);
        }
        if let Some(unwrap) = section.unwrap_comment_tag {
            templates.unwrap_comment_tag = unwrap;
        }
        if let Some(retention) = section.retention {
            templates.retention = retention;
        }
        if let Some(warn) = section.warn_on_overwrite {
            templates.warn_on_overwrite = warn;
        }
        if let Some(prefix_match) = section.prefix_match {
            templates.prefix_match = prefix_match;
        }

        templates.validate()?;

        Ok(Self { engine, templates })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_engine(path, None)
    }

    /// Load configuration from a TOML file, overriding its engine
    pub fn from_file_with_engine(
        path: impl AsRef<Path>,
        engine: Option<EngineKind>,
    ) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str_with_engine(&content, engine)
    }
}
