//! Language plugins
//!
//! Every target language implements [`Lang`]: path preview, generation,
//! project bootstrap and local testing. [`LangRegistry`] is the static table
//! of plugins, looked up by slug or alias.

pub mod go;
pub mod python;
pub mod rust;

use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use leetforge_config::{Config, ResolvedLangConfig};
use leetforge_process::ProcessOutput;
use tracing::debug;

use crate::{
    error::{LangError, Result},
    harness::{DriverSynthesizer, HarnessPlan},
    layout::{description_markdown, CodeLayout},
    merge::assemble,
    modifier::{CommandScriptRunner, ModifierFn, ModifierPipeline, ScriptRunner},
    question::QuestionData,
    result::{FileOutput, FileType, GenerateResult},
    runner::{BuildOutcome, LocalTestRunner, TestReport},
    testcase::{TestCase, TESTCASES_FILENAME},
};

pub use go::GoLang;
pub use python::PythonLang;
pub use rust::RustLang;

/// Name of the separate description file
pub const DESCRIPTION_FILENAME: &str = "question.md";

/// Capabilities of a target language
#[async_trait]
pub trait Lang: Send + Sync {
    /// Configuration slug (`go`, `python3`, `rust`)
    fn slug(&self) -> &'static str;

    /// Display name
    fn name(&self) -> &'static str;

    /// Extra names accepted when looking the language up
    fn aliases(&self) -> &'static [&'static str];

    /// Built-in modifier table
    fn builtin_modifier(&self, name: &str) -> Option<ModifierFn>;

    /// Directory and file layout for a question, without touching the
    /// filesystem. File contents are left empty.
    fn generate_paths(&self, question: &QuestionData) -> Result<GenerateResult>;

    /// Render every file for a question, merging with files already on disk
    fn generate(&self, question: &QuestionData) -> Result<GenerateResult>;

    /// Whether the project at `out_dir` depends on the test support library.
    ///
    /// A missing manifest or dependency is `Ok(false)`.
    async fn has_initialized(&self, out_dir: &Path) -> Result<bool>;

    /// Create the project manifest and add the support library; running it
    /// on an initialized project succeeds
    async fn initialize(&self, out_dir: &Path) -> Result<()>;

    /// Run every test case of a generated question
    async fn local_test(&self, question: &QuestionData, out_dir: &Path) -> Result<TestReport>;

    async fn run_local_test(&self, question: &QuestionData, out_dir: &Path) -> Result<bool> {
        Ok(self.local_test(question, out_dir).await?.passed())
    }
}

/// State and steps shared by all plugins
pub(crate) struct BaseLang {
    pub slug: &'static str,
    /// Snippet language slug used by the question service
    pub snippet_slug: &'static str,
    pub comment: &'static str,
    pub code_filename: &'static str,
    pub config: Arc<Config>,
    pub scripts: Arc<dyn ScriptRunner>,
    pub runner: LocalTestRunner,
}

impl BaseLang {
    pub fn new(
        slug: &'static str,
        snippet_slug: &'static str,
        comment: &'static str,
        code_filename: &'static str,
        config: Arc<Config>,
    ) -> Self {
        Self {
            slug,
            snippet_slug,
            comment,
            code_filename,
            config,
            scripts: Arc::new(CommandScriptRunner::new()),
            runner: LocalTestRunner::new(),
        }
    }

    pub fn resolved(&self) -> Result<ResolvedLangConfig> {
        Ok(self.config.code.resolve(self.slug)?)
    }

    /// Empty result rooted at the configured output directory
    fn empty_result(&self, question: &QuestionData, lang: &ResolvedLangConfig) -> Result<GenerateResult> {
        let sub_dir = question.formatted_filename(self.slug, &lang.filename_template)?;
        Ok(GenerateResult::new(
            self.slug,
            question.slug.clone(),
            self.config.out_dir(self.slug)?,
            sub_dir,
        ))
    }

    /// Path preview; `extra` lists language-specific files
    pub fn generate_paths(
        &self,
        question: &QuestionData,
        extra: &[(&str, FileType)],
    ) -> Result<GenerateResult> {
        let lang = self.resolved()?;
        let mut result = self.empty_result(question, &lang)?;
        result.add_file(FileOutput::placeholder(
            self.code_filename,
            FileType::CODE_FILE | FileType::TEST_FILE,
        ))?;
        for (filename, file_type) in extra {
            result.add_file(FileOutput::placeholder(*filename, *file_type))?;
        }
        result.add_file(FileOutput::placeholder(
            TESTCASES_FILENAME,
            FileType::TEST_CASES_FILE,
        ))?;
        if lang.separate_description_file {
            result.add_file(FileOutput::placeholder(DESCRIPTION_FILENAME, FileType::DOC_FILE))?;
        }
        Ok(result)
    }

    /// Full generation shared by every plugin.
    ///
    /// `plugin` supplies the built-in modifiers; `driver` writes the test
    /// harness; `extra` files are added right after the code file.
    pub fn generate<D>(
        &self,
        plugin: &dyn Lang,
        question: &QuestionData,
        prelude: String,
        driver: &D,
        extra: Vec<FileOutput>,
    ) -> Result<GenerateResult>
    where
        D: DriverSynthesizer,
    {
        let lang = self.resolved()?;
        let plan = HarnessPlan::from_question(question)?;
        let pipeline = ModifierPipeline::resolve(
            &lang.modifiers,
            |name| plugin.builtin_modifier(name),
            self.scripts.clone(),
        )?;
        let mut result = self.empty_result(question, &lang)?;

        let snippet = question
            .snippet(self.snippet_slug)
            .ok_or_else(|| LangError::MissingSnippet {
                question: question.slug.clone(),
                lang: self.slug.to_string(),
            })?;
        debug!(lang = self.slug, question = %question.slug, modifiers = ?pipeline.names(), "rendering solution");
        let code = pipeline.apply(snippet, question)?;

        let layout = CodeLayout {
            question,
            config: &self.config,
            lang: &lang,
            comment: self.comment,
            prelude,
            code,
            driver: driver.synthesize(&plan),
        };
        let path = result.target_dir().join(self.code_filename);
        let existing = read_existing(&path)?;
        let content = assemble(&layout.parts()?, existing.as_deref(), &path)?;

        result.add_file(FileOutput::new(
            self.code_filename,
            content,
            FileType::CODE_FILE | FileType::TEST_FILE,
        ))?;
        for file in extra {
            result.add_file(file)?;
        }
        result.add_file(FileOutput::new(
            TESTCASES_FILENAME,
            TestCase::format_file(&TestCase::from_question(question)),
            FileType::TEST_CASES_FILE,
        ))?;
        if lang.separate_description_file {
            result.add_file(FileOutput::new(
                DESCRIPTION_FILENAME,
                description_markdown(question, &self.config),
                FileType::DOC_FILE,
            ))?;
        }
        Ok(result)
    }

    /// The question's driver plan and its parsed test cases file
    fn load_cases(&self, question: &QuestionData, out_dir: &Path) -> Result<(HarnessPlan, Vec<TestCase>)> {
        let plan = HarnessPlan::from_question(question)?;
        let mut result = self.generate_paths(question, &[])?;
        result.set_out_dir(out_dir);

        let cases_path = result
            .path_for(FileType::TEST_CASES_FILE)
            .unwrap_or_else(|| result.target_dir().join(TESTCASES_FILENAME));
        let text = fs::read_to_string(&cases_path).map_err(|e| {
            LangError::TestCases(format!("cannot read {}: {e}", cases_path.display()))
        })?;
        let cases = TestCase::parse_file(&text)?;
        debug!(lang = self.slug, question = %question.slug, cases = cases.len(), "running local tests");
        Ok((plan, cases))
    }

    /// Run `argv` from `out_dir` over the question's test cases file
    pub async fn run_tests(
        &self,
        question: &QuestionData,
        out_dir: &Path,
        argv: Vec<String>,
    ) -> Result<TestReport> {
        let (plan, cases) = self.load_cases(question, out_dir)?;
        self.runner
            .run(&argv, out_dir, &cases, plan.answer_type())
            .await
    }

    /// Compile once with `build`, then run the program `locate` names from
    /// the build output over every test case.
    ///
    /// A failed build fails every case with the compiler output.
    pub async fn build_and_run_tests<F>(
        &self,
        question: &QuestionData,
        out_dir: &Path,
        build: Vec<String>,
        locate: F,
    ) -> Result<TestReport>
    where
        F: FnOnce(&ProcessOutput) -> Result<Vec<String>> + Send,
    {
        let (plan, cases) = self.load_cases(question, out_dir)?;
        match self.runner.build(&build, out_dir).await? {
            BuildOutcome::Failed(output) => Ok(TestReport::build_failed(&cases, &output)),
            BuildOutcome::Built(output) => {
                let argv = locate(&output)?;
                self.runner
                    .run(&argv, out_dir, &cases, plan.answer_type())
                    .await
            }
        }
    }

    /// Sub directory of a question, used to build toolchain arguments
    pub fn sub_dir(&self, question: &QuestionData) -> Result<String> {
        let lang = self.resolved()?;
        question.formatted_filename(self.slug, &lang.filename_template)
    }
}

/// Failed toolchain invocation
pub(crate) fn toolchain_error(command: &str, output: &ProcessOutput) -> LangError {
    LangError::Toolchain {
        command: command.to_string(),
        message: format!("exit code {:?}: {}", output.exit_code, output.combined().trim()),
    }
}

/// Previously generated content; absence is not an error
fn read_existing(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Static table of language plugins
#[derive(Clone)]
pub struct LangRegistry {
    config: Arc<Config>,
    langs: Vec<Arc<dyn Lang>>,
}

impl LangRegistry {
    /// Registry with every supported language
    pub fn new(config: Arc<Config>) -> Self {
        Self::with_script_runner(config, Arc::new(CommandScriptRunner::new()))
    }

    /// Registry whose plugins run modifier scripts through `scripts`
    pub fn with_script_runner(config: Arc<Config>, scripts: Arc<dyn ScriptRunner>) -> Self {
        let langs: Vec<Arc<dyn Lang>> = vec![
            Arc::new(GoLang::new(config.clone()).with_script_runner(scripts.clone())),
            Arc::new(PythonLang::new(config.clone()).with_script_runner(scripts.clone())),
            Arc::new(RustLang::new(config.clone()).with_script_runner(scripts)),
        ];
        Self { config, langs }
    }

    /// Look a language up by slug or alias, case-insensitively
    pub fn get(&self, name: &str) -> Result<Arc<dyn Lang>> {
        let name = name.trim().to_lowercase();
        self.langs
            .iter()
            .find(|l| l.slug() == name || l.aliases().contains(&name.as_str()))
            .cloned()
            .ok_or(LangError::UnsupportedLanguage(name))
    }

    /// Language named by `code.lang`
    pub fn default_lang(&self) -> Result<Arc<dyn Lang>> {
        self.get(&self.config.code.lang)
    }

    /// Output directory of a language under the project root
    pub fn out_dir(&self, lang: &dyn Lang) -> Result<PathBuf> {
        Ok(self.config.out_dir(lang.slug())?)
    }

    pub fn slugs(&self) -> Vec<&'static str> {
        self.langs.iter().map(|l| l.slug()).collect()
    }
}
