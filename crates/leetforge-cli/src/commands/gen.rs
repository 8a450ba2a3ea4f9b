// Generate solution files from question metadata

use std::path::PathBuf;

use async_trait::async_trait;
use leetforge_config::ConfigManager;
use leetforge_lang::{FileWriter, QuestionData, WriteAction, WriteReport};
use tracing::{debug, info};

use super::{resolve_lang, Command};
use crate::{error::CliResult, output::OutputStyle};

/// Generate (or regenerate) the files of one or more questions
pub struct GenCommand {
    /// Question metadata files, as returned by the question service
    pub questions: Vec<PathBuf>,
    pub lang: Option<String>,
    pub dry_run: bool,
    manager: ConfigManager,
}

impl GenCommand {
    pub fn new(questions: Vec<PathBuf>) -> Self {
        Self {
            questions,
            lang: None,
            dry_run: false,
            manager: ConfigManager::new(),
        }
    }

    pub fn with_lang(mut self, lang: Option<String>) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_config_manager(mut self, manager: ConfigManager) -> Self {
        self.manager = manager;
        self
    }

    /// Generate and persist every question in order, stopping at the first
    /// failure. Files of questions already handled stay written.
    pub fn generate(&self) -> CliResult<Vec<WriteReport>> {
        let (_, plugin) = resolve_lang(&self.manager, self.lang.as_deref())?;
        let writer = FileWriter::new().dry_run(self.dry_run);

        let mut reports = Vec::with_capacity(self.questions.len());
        for path in &self.questions {
            debug!(file = %path.display(), lang = plugin.slug(), "loading question");
            let question = QuestionData::from_file(path)?;
            let result = plugin.generate(&question)?;
            let report = writer.write(&result)?;
            info!(
                question = %question.slug,
                lang = plugin.slug(),
                dir = %result.target_dir().display(),
                "question generated"
            );
            reports.push(report);
        }
        Ok(reports)
    }
}

fn action_label(action: WriteAction) -> &'static str {
    match action {
        WriteAction::Created => "created",
        WriteAction::Updated => "updated",
        WriteAction::Unchanged => "unchanged",
        WriteAction::Skipped => "would write",
    }
}

#[async_trait]
impl Command for GenCommand {
    async fn execute(&self) -> CliResult<()> {
        let reports = self.generate()?;
        let style = OutputStyle::default();

        for (path, report) in self.questions.iter().zip(&reports) {
            println!("{}", style.section(&path.display().to_string()));
            for file in &report.files {
                println!(
                    "{}",
                    style.list_item(&format!(
                        "{:<11} {}",
                        action_label(file.action),
                        file.path.display()
                    ))
                );
            }
        }

        let written: usize = reports.iter().map(WriteReport::written).sum();
        if self.dry_run {
            println!("{}", style.info("Dry run, nothing was written"));
        } else {
            println!(
                "{}",
                style.success(&format!(
                    "Generated {} question(s), {} file(s) written",
                    reports.len(),
                    written
                ))
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use leetforge_lang::LangError;
    use tempfile::TempDir;

    use super::*;
    use crate::error::CliError;

    const TWO_SUM: &str = r#"{
        "questionId": "1",
        "questionFrontendId": "1",
        "title": "Two Sum",
        "titleSlug": "two-sum",
        "difficulty": "Easy",
        "content": "<pre><strong>Output:</strong> [0,1]</pre>",
        "codeSnippets": [
            {"lang": "Python3", "langSlug": "python3", "code": "class Solution:\n    def twoSum(self, nums: List[int], target: int) -> List[int]:\n        "}
        ],
        "exampleTestcaseList": ["[2,7,11,15]\n9"],
        "metaData": {"name": "twoSum", "params": [{"name": "nums", "type": "integer[]"}, {"name": "target", "type": "integer"}], "return": {"type": "integer[]"}}
    }"#;

    fn setup(dir: &TempDir) -> (PathBuf, ConfigManager) {
        let project = dir.path().join("project");
        fs::create_dir_all(&project).unwrap();
        let question = dir.path().join("two-sum.json");
        fs::write(&question, TWO_SUM).unwrap();
        let manager = ConfigManager::new()
            .with_config_dir(dir.path().join("global"))
            .with_start_dir(project)
            .with_env_prefix("LEETFORGE_TEST_UNSET");
        (question, manager)
    }

    #[test]
    fn test_gen_writes_files() {
        let dir = TempDir::new().unwrap();
        let (question, manager) = setup(&dir);

        let reports = GenCommand::new(vec![question])
            .with_lang(Some("python3".to_string()))
            .with_config_manager(manager)
            .generate()
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].written(), 2);
        let target = dir.path().join("project/python/0001.two-sum");
        assert!(target.join("solution.py").is_file());
        assert!(target.join("testcases.txt").is_file());
    }

    #[test]
    fn test_gen_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let (question, manager) = setup(&dir);

        let reports = GenCommand::new(vec![question])
            .with_lang(Some("py".to_string()))
            .with_dry_run(true)
            .with_config_manager(manager)
            .generate()
            .unwrap();

        assert!(reports[0]
            .files
            .iter()
            .all(|f| f.action == WriteAction::Skipped));
        assert!(!dir.path().join("project/python").exists());
    }

    #[test]
    fn test_gen_default_lang_without_snippet_fails() {
        let dir = TempDir::new().unwrap();
        let (question, manager) = setup(&dir);

        let err = GenCommand::new(vec![question])
            .with_config_manager(manager)
            .generate()
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Lang(LangError::MissingSnippet { .. })
        ));
    }

    #[test]
    fn test_gen_missing_question_file() {
        let dir = TempDir::new().unwrap();
        let (_, manager) = setup(&dir);

        let err = GenCommand::new(vec![dir.path().join("nope.json")])
            .with_lang(Some("python3".to_string()))
            .with_config_manager(manager)
            .generate()
            .unwrap_err();
        assert!(matches!(err, CliError::Lang(LangError::Io(_))));
    }
}
