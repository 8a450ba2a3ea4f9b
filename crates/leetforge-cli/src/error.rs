// CLI error types

use leetforge_config::ConfigError;
use leetforge_lang::LangError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lang(#[from] LangError),

    #[error("{failed} of {total} test cases failed")]
    TestsFailed { failed: usize, total: usize },
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::InvalidArgument { message } => {
                format!(
                    "Invalid argument: {}\n\nRun 'leetforge --help' for usage information.",
                    message
                )
            }
            CliError::Io(e) => format!("File operation failed: {}", e),
            CliError::Config(e) => format!(
                "Configuration error: {}\n\nCheck leetforge.yaml or run 'leetforge init'.",
                e
            ),
            CliError::Lang(LangError::TestCases(msg)) => format!(
                "No usable test cases: {}\n\nRun 'leetforge gen' for this question first.",
                msg
            ),
            CliError::Lang(LangError::UnsupportedLanguage(lang)) => format!(
                "Language not supported: {}\n\nAvailable languages: go, python3, rust.",
                lang
            ),
            CliError::Lang(e @ LangError::Toolchain { .. }) => format!(
                "{}\n\nMake sure the language toolchain is installed and on PATH.",
                e
            ),
            CliError::Lang(LangError::Merge { path, message }) => format!(
                "Cannot regenerate {}: {}\n\nThe file was left untouched. Restore the code markers or move the file away.",
                path.display(),
                message
            ),
            CliError::Lang(e) => format!("Code generation failed: {}", e),
            CliError::TestsFailed { failed, total } => {
                format!("{} of {} test cases failed", failed, total)
            }
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
