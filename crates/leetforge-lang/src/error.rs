//! Error types for generation and local testing

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, LangError>;

/// Errors raised while generating or testing a question
#[derive(Debug, Error)]
pub enum LangError {
    /// A configured modifier is neither built in nor scripted
    #[error("unknown modifier: {0}")]
    UnknownModifier(String),

    /// The filename template could not be rendered
    #[error("invalid filename template {template:?}: {message}")]
    FilenameTemplate { template: String, message: String },

    /// A block template could not be rendered
    #[error("invalid template for block {block}: {message}")]
    BlockTemplate { block: String, message: String },

    /// A pre-existing file could not be merged; it was left untouched
    #[error("cannot merge {path}: {message}")]
    Merge { path: PathBuf, message: String },

    /// Question metadata cannot drive a test harness
    #[error("unsupported question metadata for {question}: {message}")]
    MetadataShape { question: String, message: String },

    /// An external modifier script failed
    #[error("modifier script {name} failed: {message}")]
    Script { name: String, message: String },

    /// Two outputs of one generation share a filename
    #[error("duplicate output file: {0}")]
    DuplicateFile(String),

    /// No plugin for the requested language
    #[error("language not supported: {0}")]
    UnsupportedLanguage(String),

    /// The question has no code snippet for the language
    #[error("question {question} has no code snippet for {lang}")]
    MissingSnippet { question: String, lang: String },

    /// A serialized value does not match its declared type
    #[error("cannot decode {input:?} as {expected}: {message}")]
    Codec {
        input: String,
        expected: String,
        message: String,
    },

    /// Malformed test cases file
    #[error("invalid test cases: {0}")]
    TestCases(String),

    /// A project manifest has an unexpected shape
    #[error("invalid manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// A toolchain command could not be run
    #[error("{command} failed: {message}")]
    Toolchain { command: String, message: String },

    #[error(transparent)]
    Config(#[from] leetforge_config::ConfigError),

    #[error(transparent)]
    Process(#[from] leetforge_process::ProcessError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlRead(#[from] toml::de::Error),

    #[error("TOML error: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

impl LangError {
    pub(crate) fn metadata(question: &str, message: impl Into<String>) -> Self {
        LangError::MetadataShape {
            question: question.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn codec(input: &str, expected: impl ToString, message: impl Into<String>) -> Self {
        LangError::Codec {
            input: input.to_string(),
            expected: expected.to_string(),
            message: message.into(),
        }
    }
}
