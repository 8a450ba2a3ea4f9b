// Initialize a leetforge project

use std::{
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use leetforge_config::{
    Config, ConfigManager, LeetcodeSite, PROJECT_CONFIG_FILENAME, PROJECT_URL,
};
use tracing::debug;

use super::Command;
use crate::{
    error::{CliError, CliResult},
    output::OutputStyle,
};

/// Files touched by `init`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub created: Vec<PathBuf>,
    /// Files that already existed and were kept
    pub kept: Vec<PathBuf>,
}

/// Create the global config file and a project `leetforge.yaml`
pub struct InitCommand {
    pub project_path: Option<PathBuf>,
    pub site: LeetcodeSite,
    pub force: bool,
    manager: ConfigManager,
}

impl InitCommand {
    pub fn new(project_path: Option<PathBuf>) -> Self {
        Self {
            project_path,
            site: LeetcodeSite::Cn,
            force: false,
            manager: ConfigManager::new(),
        }
    }

    pub fn with_site(mut self, site: LeetcodeSite) -> Self {
        self.site = site;
        self
    }

    /// Overwrite an existing project file
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn with_config_manager(mut self, manager: ConfigManager) -> Self {
        self.manager = manager;
        self
    }

    fn target_dir(&self) -> CliResult<PathBuf> {
        match &self.project_path {
            Some(path) => Ok(path.clone()),
            None => Ok(std::env::current_dir()?),
        }
    }

    /// Write the configuration files, leaving existing ones alone
    pub fn init(&self) -> CliResult<InitReport> {
        let target = self.target_dir()?;
        if target.is_file() {
            return Err(CliError::InvalidArgument {
                message: format!("{} is a file, not a directory", target.display()),
            });
        }
        fs::create_dir_all(&target)?;

        let mut config = self.manager.load(true)?.with_project_root(&target);
        config.leetcode.site = self.site;

        let mut report = InitReport::default();

        let global = config.global_config_file();
        if global.exists() {
            debug!(file = %global.display(), "global config already present");
            report.kept.push(global);
        } else {
            fs::create_dir_all(config.config_dir())?;
            let mut defaults = Config::default().with_config_dir(config.config_dir());
            defaults.leetcode.site = self.site;
            write_config(&global, &defaults, None)?;
            report.created.push(global);
        }

        let project = target.join(PROJECT_CONFIG_FILENAME);
        if project.exists() && !self.force {
            report.kept.push(project);
        } else {
            let header = project_header(&config);
            write_config(&project, &config, Some(&header))?;
            report.created.push(project);
        }

        Ok(report)
    }
}

fn project_header(config: &Config) -> String {
    format!(
        "# leetforge project configuration\n\
         # Values here override the global config at {}.\n\
         # Delete any key to fall back to it.\n\
         # Documentation: {}\n\n",
        config.global_config_file().display(),
        PROJECT_URL
    )
}

fn write_config(path: &Path, config: &Config, header: Option<&str>) -> CliResult<()> {
    let mut buf = header.unwrap_or_default().as_bytes().to_vec();
    config.write_yaml(&mut buf)?;
    fs::write(path, buf)?;
    debug!(file = %path.display(), "config written");
    Ok(())
}

#[async_trait]
impl Command for InitCommand {
    async fn execute(&self) -> CliResult<()> {
        let report = self.init()?;
        let style = OutputStyle::default();

        for path in &report.created {
            println!("{}", style.success(&format!("Created {}", path.display())));
        }
        for path in &report.kept {
            println!(
                "{}",
                style.warning(&format!("{} already exists, kept as is", path.display()))
            );
        }
        if report.kept.iter().any(|p| p.ends_with(PROJECT_CONFIG_FILENAME)) {
            println!("{}", style.tip("Pass --force to rewrite the project file"));
        }
        println!();
        println!(
            "{}",
            style.tip(&format!(
                "Next: {} then {}",
                style.code("leetforge setup"),
                style.code("leetforge gen <question.json>")
            ))
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn command(dir: &TempDir) -> InitCommand {
        InitCommand::new(Some(dir.path().join("project"))).with_config_manager(
            ConfigManager::new()
                .with_config_dir(dir.path().join("global"))
                .with_start_dir(dir.path().join("project"))
                .with_env_prefix("LEETFORGE_TEST_UNSET"),
        )
    }

    #[test]
    fn test_init_creates_both_files() {
        let dir = TempDir::new().unwrap();
        let report = command(&dir).with_site(LeetcodeSite::Us).init().unwrap();

        assert_eq!(report.created.len(), 2);
        assert!(report.kept.is_empty());

        let project = fs::read_to_string(dir.path().join("project/leetforge.yaml")).unwrap();
        assert!(project.starts_with("# leetforge project configuration\n"));
        assert!(project.contains("https://leetcode.com"));

        let global = fs::read_to_string(dir.path().join("global/config.yaml")).unwrap();
        assert!(global.contains("author: Bob"));
        assert!(global.contains("https://leetcode.com"));
    }

    #[test]
    fn test_init_keeps_existing_project_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("project")).unwrap();
        fs::write(dir.path().join("project/leetforge.yaml"), "author: Alice\n").unwrap();

        let report = command(&dir).init().unwrap();
        assert_eq!(report.kept, vec![dir.path().join("project/leetforge.yaml")]);
        assert_eq!(
            fs::read_to_string(dir.path().join("project/leetforge.yaml")).unwrap(),
            "author: Alice\n"
        );
    }

    #[test]
    fn test_force_rewrites_project_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("project")).unwrap();
        fs::write(dir.path().join("project/leetforge.yaml"), "author: Alice\n").unwrap();

        command(&dir).with_force(true).init().unwrap();
        let project = fs::read_to_string(dir.path().join("project/leetforge.yaml")).unwrap();
        assert!(project.contains("lang: go"));
    }

    #[test]
    fn test_written_project_file_loads() {
        let dir = TempDir::new().unwrap();
        command(&dir).with_site(LeetcodeSite::Us).init().unwrap();

        let config = ConfigManager::new()
            .with_config_dir(dir.path().join("global"))
            .with_start_dir(dir.path().join("project"))
            .with_env_prefix("LEETFORGE_TEST_UNSET")
            .load(false)
            .unwrap();
        assert_eq!(config.leetcode.site, LeetcodeSite::Us);
        assert_eq!(config.project_root(), dir.path().join("project"));
    }

    #[test]
    fn test_init_rejects_file_target() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("project"), "").unwrap();
        assert!(matches!(
            command(&dir).init(),
            Err(CliError::InvalidArgument { .. })
        ));
    }
}
