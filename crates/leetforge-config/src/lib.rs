//! leetforge configuration
//!
//! Loads the global and project configuration files, merges them with the
//! built-in defaults and environment overrides, and resolves per-language
//! settings for code generation.

pub mod error;
pub mod manager;
pub mod types;

pub use error::{ConfigError, Result};
pub use manager::ConfigManager;
pub use types::{
    Block, CodeConfig, Config, LangConfig, Language, LeetCodeConfig, LeetcodeSite, Modifier,
    ResolvedLangConfig, CMD_NAME, CODE_REGION, GLOBAL_CONFIG_FILE, PROJECT_CONFIG_FILENAME,
    PROJECT_URL, REGION_MARKER_TAG, STANDARD_BLOCKS, SUPPORTED_LANGS,
};
