// Command handlers for the leetforge CLI

pub mod gen;
pub mod init;
pub mod setup;

pub use gen::GenCommand;
pub use init::InitCommand;
pub use setup::SetupCommand;
pub use test::TestCommand;

use std::sync::Arc;

use leetforge_config::ConfigManager;
use leetforge_lang::{Lang, LangRegistry};

use crate::error::CliResult;

/// Trait for command handlers
#[async_trait::async_trait]
pub trait Command: Send + Sync {
    /// Execute the command
    async fn execute(&self) -> CliResult<()>;
}

/// Load the configuration and pick the plugin named by `--lang`, or the
/// configured `code.lang` when absent
pub(crate) fn resolve_lang(
    manager: &ConfigManager,
    lang: Option<&str>,
) -> CliResult<(LangRegistry, Arc<dyn Lang>)> {
    let config = Arc::new(manager.load(false)?);
    let registry = LangRegistry::new(config);
    let plugin = match lang {
        Some(name) => registry.get(name)?,
        None => registry.default_lang()?,
    };
    Ok((registry, plugin))
}
