// Bootstrap a language's output project

use async_trait::async_trait;
use leetforge_config::ConfigManager;
use tracing::info;

use super::{resolve_lang, Command};
use crate::{error::CliResult, output::OutputStyle};

/// What `setup` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    AlreadyInitialized,
    Initialized,
}

/// Create the project manifest of a language and add the test support
/// library, unless already done
pub struct SetupCommand {
    pub lang: Option<String>,
    manager: ConfigManager,
}

impl SetupCommand {
    pub fn new(lang: Option<String>) -> Self {
        Self {
            lang,
            manager: ConfigManager::new(),
        }
    }

    pub fn with_config_manager(mut self, manager: ConfigManager) -> Self {
        self.manager = manager;
        self
    }

    pub async fn setup(&self) -> CliResult<SetupOutcome> {
        let (registry, plugin) = resolve_lang(&self.manager, self.lang.as_deref())?;
        let out_dir = registry.out_dir(plugin.as_ref())?;

        if plugin.has_initialized(&out_dir).await? {
            return Ok(SetupOutcome::AlreadyInitialized);
        }
        plugin.initialize(&out_dir).await?;
        info!(lang = plugin.slug(), out_dir = %out_dir.display(), "project initialized");
        Ok(SetupOutcome::Initialized)
    }
}

#[async_trait]
impl Command for SetupCommand {
    async fn execute(&self) -> CliResult<()> {
        let style = OutputStyle::default();
        match self.setup().await? {
            SetupOutcome::AlreadyInitialized => {
                println!("{}", style.info("Project already initialized, nothing to do"))
            }
            SetupOutcome::Initialized => println!("{}", style.success("Project initialized")),
        }
        Ok(())
    }
}
