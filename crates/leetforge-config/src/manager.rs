//! Configuration manager implementation

use std::path::{Path, PathBuf};

use config::{Config as Layers, Environment, File, FileFormat};
use tracing::{debug, warn};

use crate::{
    error::{ConfigError, Result},
    types::{default_config_dir, Config, PROJECT_CONFIG_FILENAME},
};

/// Loads the layered configuration: defaults, global file, project file,
/// then `LEETFORGE__*` environment variables.
pub struct ConfigManager {
    /// Directory holding the global config file
    config_dir: PathBuf,
    /// Directory the project root search starts from
    start_dir: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a new configuration manager rooted at the working directory
    pub fn new() -> Self {
        Self {
            config_dir: default_config_dir(),
            start_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "LEETFORGE".to_string(),
        }
    }

    /// Use another global config directory
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Start the project root search from another directory
    pub fn with_start_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.start_dir = dir.into();
        self
    }

    /// Use another environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Nearest ancestor of the start directory containing `leetforge.yaml`,
    /// or the start directory itself when none does.
    pub fn find_project_root(&self) -> PathBuf {
        find_project_root(&self.start_dir)
    }

    /// Load and validate the configuration.
    ///
    /// With `init` set the project file is ignored, since `init` is about
    /// to create it. A missing file is not an error.
    pub fn load(&self, init: bool) -> Result<Config> {
        let defaults = Config::default()
            .with_config_dir(self.config_dir.clone())
            .with_project_root(self.find_project_root());

        let global_file = defaults.global_config_file();
        let project_file = defaults.project_config_file();

        let mut builder = Layers::builder().add_source(Layers::try_from(&defaults)?);

        if global_file.exists() {
            debug!(file = %global_file.display(), "loading global config");
            builder = builder.add_source(yaml_file(&global_file));
        } else if !init {
            warn!(
                file = %global_file.display(),
                "global config file not found, have you run `leetforge init`?"
            );
        }

        if !init {
            if project_file.exists() {
                debug!(file = %project_file.display(), "loading project config");
                builder = builder.add_source(yaml_file(&project_file));
            } else {
                warn!(
                    file = %project_file.display(),
                    "{} not found, using global config only", PROJECT_CONFIG_FILENAME
                );
            }
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .separator("__")
                .try_parsing(true),
        );

        let layers = builder.build().map_err(|e| ConfigError::Load {
            path: project_file.display().to_string(),
            message: e.to_string(),
        })?;
        let config: Config = layers.try_deserialize()?;
        let config = config
            .with_config_dir(defaults.config_dir().to_path_buf())
            .with_project_root(defaults.project_root().to_path_buf());

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn yaml_file(path: &Path) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Yaml).required(false)
}

fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_CONFIG_FILENAME).is_file())
        .unwrap_or(start)
        .to_path_buf()
}
