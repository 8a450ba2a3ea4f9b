//! Local test runner
//!
//! Compiles a generated driver once, then runs it per test case, feeding the
//! case input on stdin, and compares the sentinel answer with the expected
//! output.

use std::{path::Path, time::Duration};

use leetforge_process::{ProcessConfig, ProcessError, ProcessManager, ProcessOutput};
use tracing::{info, warn};

use crate::{
    codec::{self, AbstractType, DOUBLE_EPSILON},
    error::{LangError, Result},
    harness::extract_answer,
    testcase::TestCase,
};

/// Per-case limit unless configured otherwise
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Limit for the one-off compile step; cold toolchain builds fetch and
/// compile dependencies
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(300);

/// Result of the compile step
#[derive(Debug)]
pub enum BuildOutcome {
    Built(ProcessOutput),
    /// Compiler output, or why the compiler did not finish
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    WrongAnswer,
    /// The driver printed no answer line (crash, compile error, missing toolchain)
    NoAnswer,
    TimedOut,
}

/// Result of one test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseResult {
    pub index: usize,
    pub input: Vec<String>,
    pub expected: String,
    pub actual: Option<String>,
    pub outcome: Outcome,
    /// Captured stdout and stderr
    pub output: String,
}

impl CaseResult {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Passed
    }
}

/// Results of a local test run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestReport {
    pub cases: Vec<CaseResult>,
}

impl TestReport {
    /// True when at least one case ran and every case passed
    pub fn passed(&self) -> bool {
        !self.cases.is_empty() && self.cases.iter().all(CaseResult::passed)
    }

    /// Every runnable case fails with the compiler output attached
    pub fn build_failed(cases: &[TestCase], output: &str) -> Self {
        let cases = cases
            .iter()
            .enumerate()
            .filter(|(_, case)| case.has_expected())
            .map(|(index, case)| CaseResult {
                index,
                input: case.input.clone(),
                expected: case.output.clone(),
                actual: None,
                outcome: Outcome::NoAnswer,
                output: output.to_string(),
            })
            .collect();
        Self { cases }
    }

    pub fn failures(&self) -> impl Iterator<Item = &CaseResult> {
        self.cases.iter().filter(|c| !c.passed())
    }
}

/// Drives a toolchain command over test cases
#[derive(Debug, Clone)]
pub struct LocalTestRunner {
    manager: ProcessManager,
    timeout: Duration,
    build_timeout: Duration,
}

impl LocalTestRunner {
    pub fn new() -> Self {
        Self {
            manager: ProcessManager::new(),
            timeout: DEFAULT_TIMEOUT,
            build_timeout: DEFAULT_BUILD_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_build_timeout(mut self, timeout: Duration) -> Self {
        self.build_timeout = timeout;
        self
    }

    /// Run a compile command once under the build timeout.
    ///
    /// A non-zero exit, a missing compiler or a timeout is a
    /// [`BuildOutcome::Failed`], not an error.
    pub async fn build(&self, argv: &[String], cwd: &Path) -> Result<BuildOutcome> {
        let config = command(argv)?.working_dir(cwd).timeout(self.build_timeout);
        let label = config.to_string();
        let outcome = match self.manager.run(config).await {
            Ok(output) if output.success() => BuildOutcome::Built(output),
            Ok(output) => BuildOutcome::Failed(output.combined()),
            Err(ProcessError::Timeout { limit }) => {
                BuildOutcome::Failed(format!("build timed out after {limit:?}"))
            }
            Err(err @ ProcessError::SpawnFailed { .. }) => BuildOutcome::Failed(err.to_string()),
            Err(err) => return Err(err.into()),
        };
        match &outcome {
            BuildOutcome::Built(_) => info!(command = %label, "build finished"),
            BuildOutcome::Failed(output) => warn!(command = %label, %output, "build failed"),
        }
        Ok(outcome)
    }

    /// Run `argv` in `cwd` for every case with a known expected output.
    ///
    /// `answer_type` enables typed comparison of answers.
    pub async fn run(
        &self,
        argv: &[String],
        cwd: &Path,
        cases: &[TestCase],
        answer_type: Option<&AbstractType>,
    ) -> Result<TestReport> {
        let base = command(argv)?;

        let mut report = TestReport::default();
        for (index, case) in cases.iter().enumerate() {
            if !case.has_expected() {
                warn!(case = index + 1, "skipping test case without expected output");
                continue;
            }
            let config = base
                .clone()
                .working_dir(cwd)
                .stdin(case.stdin())
                .timeout(self.timeout);
            let result = self.run_case(index, case, config, answer_type).await?;
            match result.outcome {
                Outcome::Passed => info!(case = index + 1, "passed"),
                outcome => warn!(
                    case = index + 1,
                    ?outcome,
                    expected = %result.expected,
                    actual = ?result.actual,
                    "failed"
                ),
            }
            report.cases.push(result);
        }
        Ok(report)
    }

    async fn run_case(
        &self,
        index: usize,
        case: &TestCase,
        config: ProcessConfig,
        answer_type: Option<&AbstractType>,
    ) -> Result<CaseResult> {
        let mut result = CaseResult {
            index,
            input: case.input.clone(),
            expected: case.output.clone(),
            actual: None,
            outcome: Outcome::NoAnswer,
            output: String::new(),
        };

        let output = match self.manager.run(config).await {
            Ok(output) => output,
            Err(ProcessError::Timeout { limit }) => {
                result.outcome = Outcome::TimedOut;
                result.output = format!("timed out after {limit:?}");
                return Ok(result);
            }
            Err(err @ ProcessError::SpawnFailed { .. }) => {
                result.output = err.to_string();
                return Ok(result);
            }
            Err(err) => return Err(err.into()),
        };

        result.output = output.combined();
        result.actual = extract_answer(&output.stdout).map(str::to_string);
        result.outcome = match &result.actual {
            Some(actual) if answers_match(&case.output, actual, answer_type) => Outcome::Passed,
            Some(_) => Outcome::WrongAnswer,
            None => Outcome::NoAnswer,
        };
        Ok(result)
    }
}

fn command(argv: &[String]) -> Result<ProcessConfig> {
    ProcessConfig::from_argv(argv).ok_or_else(|| LangError::Toolchain {
        command: String::new(),
        message: "empty command".to_string(),
    })
}

impl Default for LocalTestRunner {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare serialized answers.
///
/// Typed decoding first, then untyped JSON, then trimmed text.
pub fn answers_match(expected: &str, actual: &str, answer_type: Option<&AbstractType>) -> bool {
    if let Some(ty) = answer_type {
        if let (Ok(e), Ok(a)) = (
            codec::deserialize(expected, ty),
            codec::deserialize(actual, ty),
        ) {
            return e.approx_eq(&a);
        }
    }
    match (
        serde_json::from_str::<serde_json::Value>(expected),
        serde_json::from_str::<serde_json::Value>(actual),
    ) {
        (Ok(e), Ok(a)) => json_approx_eq(&e, &a),
        _ => expected.trim() == actual.trim(),
    }
}

fn json_approx_eq(a: &serde_json::Value, b: &serde_json::Value) -> bool {
    use serde_json::Value;

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => (x - y).abs() <= DOUBLE_EPSILON,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| json_approx_eq(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| json_approx_eq(v, w)))
        }
        _ => a == b,
    }
}
