//! Core configuration types and data structures

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Name of the binary, also used for the global config directory
pub const CMD_NAME: &str = "leetforge";
/// Global configuration file name inside the config directory
pub const GLOBAL_CONFIG_FILE: &str = "config.yaml";
/// Project configuration file name, marks the project root
pub const PROJECT_CONFIG_FILENAME: &str = "leetforge.yaml";
/// Tag of region marker lines: `<comment> @lc <name>=begin|end`
pub const REGION_MARKER_TAG: &str = "@lc";
/// Name of the user-owned solution region
pub const CODE_REGION: &str = "code";
/// Project homepage, referenced from generated project files
pub const PROJECT_URL: &str = "https://github.com/leetforge/leetforge";

/// Block names a generated code file is assembled from, in file order.
///
/// `beforeCode`, `code` and `afterCode` live inside the code markers.
pub const STANDARD_BLOCKS: [&str; 8] = [
    "header",
    "description",
    "title",
    "beforeMarker",
    "beforeCode",
    "code",
    "afterCode",
    "afterMarker",
];

/// Language slugs with a dedicated configuration section
pub const SUPPORTED_LANGS: [&str; 3] = ["go", "python3", "rust"];

/// LeetCode site the questions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeetcodeSite {
    #[serde(rename = "https://leetcode.cn")]
    Cn,
    #[serde(rename = "https://leetcode.com")]
    Us,
}

impl LeetcodeSite {
    /// Base URL of the site
    pub fn base_url(&self) -> &'static str {
        match self {
            LeetcodeSite::Cn => "https://leetcode.cn",
            LeetcodeSite::Us => "https://leetcode.com",
        }
    }
}

/// Language of question descriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
}

/// A named section of a generated file with its default rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub template: String,
}

/// A named transform applied to freshly rendered solution code.
///
/// Without `script` the name must resolve to a built-in modifier of the
/// target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
}

impl Modifier {
    /// Built-in modifier reference
    pub fn builtin(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: None,
        }
    }
}

/// Per-language overrides of the `code` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LangConfig {
    /// Directory (relative to the project root) holding this language's questions
    pub out_dir: String,
    /// Overrides `code.filename_template`
    #[serde(skip_serializing_if = "String::is_empty")]
    pub filename_template: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub separate_description_file: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
}

impl LangConfig {
    fn with_out_dir(out_dir: &str) -> Self {
        Self {
            out_dir: out_dir.to_string(),
            ..Default::default()
        }
    }
}

/// Code generation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeConfig {
    /// Language generated when none is given explicitly
    pub lang: String,
    /// Handlebars template for the question directory name.
    ///
    /// Attributes: id, slug, title, difficulty, lang, slug_is_meaningful.
    /// Helpers: pad_with_zero, lower, upper, trim, to_underscore.
    pub filename_template: String,
    pub separate_description_file: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub modifiers: Vec<Modifier>,
    pub go: LangConfig,
    pub python3: LangConfig,
    pub rust: LangConfig,
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            lang: "go".to_string(),
            filename_template:
                "{{pad_with_zero id 4}}{{#if slug_is_meaningful}}.{{slug}}{{/if}}".to_string(),
            separate_description_file: false,
            blocks: Vec::new(),
            modifiers: vec![Modifier::builtin("removeUselessComments")],
            go: LangConfig {
                out_dir: "go".to_string(),
                modifiers: vec![
                    Modifier::builtin("removeUselessComments"),
                    Modifier::builtin("changeReceiverName"),
                    Modifier::builtin("addNamedReturn"),
                    Modifier::builtin("addMod"),
                ],
                ..Default::default()
            },
            python3: LangConfig::with_out_dir("python"),
            rust: LangConfig::with_out_dir("rust"),
        }
    }
}

/// Language configuration after merging the `code` defaults with the
/// language-specific section
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLangConfig {
    pub slug: String,
    pub out_dir: String,
    pub filename_template: String,
    pub separate_description_file: bool,
    pub blocks: Vec<Block>,
    pub modifiers: Vec<Modifier>,
}

impl CodeConfig {
    /// Language-specific section for a slug
    pub fn lang_config(&self, slug: &str) -> Option<&LangConfig> {
        match slug {
            "go" => Some(&self.go),
            "python3" => Some(&self.python3),
            "rust" => Some(&self.rust),
            _ => None,
        }
    }

    /// Merge the language section over the shared defaults.
    ///
    /// Non-empty language values win; `out_dir` falls back to the slug.
    pub fn resolve(&self, slug: &str) -> Result<ResolvedLangConfig> {
        let lang = self
            .lang_config(slug)
            .ok_or_else(|| ConfigError::UnknownLanguage(slug.to_string()))?;

        Ok(ResolvedLangConfig {
            slug: slug.to_string(),
            out_dir: if lang.out_dir.is_empty() {
                slug.to_string()
            } else {
                lang.out_dir.clone()
            },
            filename_template: if lang.filename_template.is_empty() {
                self.filename_template.clone()
            } else {
                lang.filename_template.clone()
            },
            separate_description_file: lang.separate_description_file
                || self.separate_description_file,
            blocks: pick_vec(&lang.blocks, &self.blocks),
            modifiers: pick_vec(&lang.modifiers, &self.modifiers),
        })
    }
}

/// LeetCode site configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeetCodeConfig {
    pub site: LeetcodeSite,
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            site: LeetcodeSite::Cn,
        }
    }
}

/// Main application configuration.
///
/// Immutable once loaded; generation code receives it explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Author name rendered into file headers
    pub author: String,
    /// Language of question descriptions
    pub language: Language,
    pub code: CodeConfig,
    pub leetcode: LeetCodeConfig,
    #[serde(skip)]
    pub(crate) config_dir: PathBuf,
    #[serde(skip)]
    pub(crate) project_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            author: "Bob".to_string(),
            language: Language::Zh,
            code: CodeConfig::default(),
            leetcode: LeetCodeConfig::default(),
            config_dir: default_config_dir(),
            project_root: PathBuf::from("."),
        }
    }
}

/// `~/.config/leetforge`, falling back to the working directory
pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(CMD_NAME)
}

impl Config {
    /// Directory holding the global configuration
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Directory containing `leetforge.yaml`
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn global_config_file(&self) -> PathBuf {
        self.config_dir.join(GLOBAL_CONFIG_FILE)
    }

    pub fn project_config_file(&self) -> PathBuf {
        self.project_root.join(PROJECT_CONFIG_FILENAME)
    }

    /// Same configuration rooted at another project directory
    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = root.into();
        self
    }

    /// Same configuration with another global config directory
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Absolute output directory of a language
    pub fn out_dir(&self, slug: &str) -> Result<PathBuf> {
        let resolved = self.code.resolve(slug)?;
        Ok(self.project_root.join(resolved.out_dir))
    }

    /// Serialize as YAML
    pub fn write_yaml<W: Write>(&self, writer: W) -> Result<()> {
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Check invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.code.lang.is_empty() {
            return Err(ConfigError::Validation("code.lang is empty".to_string()));
        }

        validate_blocks("code.blocks", &self.code.blocks)?;
        validate_modifiers("code.modifiers", &self.code.modifiers)?;
        for slug in SUPPORTED_LANGS {
            if let Some(lang) = self.code.lang_config(slug) {
                validate_blocks(&format!("code.{slug}.blocks"), &lang.blocks)?;
                validate_modifiers(&format!("code.{slug}.modifiers"), &lang.modifiers)?;
            }
        }
        Ok(())
    }
}

fn pick_vec<T: Clone>(own: &[T], shared: &[T]) -> Vec<T> {
    if own.is_empty() {
        shared.to_vec()
    } else {
        own.to_vec()
    }
}

fn validate_blocks(section: &str, blocks: &[Block]) -> Result<()> {
    let mut seen = std::collections::HashSet::new();
    for block in blocks {
        if !STANDARD_BLOCKS.contains(&block.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{section}: unknown block name {:?}, expected one of {}",
                block.name,
                STANDARD_BLOCKS.join(", ")
            )));
        }
        if !seen.insert(block.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "{section}: duplicate block {:?}",
                block.name
            )));
        }
    }
    Ok(())
}

fn validate_modifiers(section: &str, modifiers: &[Modifier]) -> Result<()> {
    if modifiers.iter().any(|m| m.name.trim().is_empty()) {
        return Err(ConfigError::Validation(format!(
            "{section}: modifier name is empty"
        )));
    }
    Ok(())
}
