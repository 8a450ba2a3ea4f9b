//! `testcases.txt` reading and writing
//!
//! ```text
//! input:
//! [2,7,11,15]
//! 9
//! output:
//! [0,1]
//!
//! input:
//! ...
//! ```

use crate::{
    error::{LangError, Result},
    question::QuestionData,
};

pub const TESTCASES_FILENAME: &str = "testcases.txt";

const INPUT_HEADER: &str = "input:";
const OUTPUT_HEADER: &str = "output:";

/// One local test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    /// Lines fed to the driver on stdin
    pub input: Vec<String>,
    /// Expected serialized answer, empty when unknown
    pub output: String,
}

impl TestCase {
    pub fn new<I, S>(input: I, output: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: input.into_iter().map(Into::into).collect(),
            output: output.into(),
        }
    }

    /// Text written to the driver's stdin
    pub fn stdin(&self) -> String {
        let mut text = self.input.join("\n");
        text.push('\n');
        text
    }

    pub fn has_expected(&self) -> bool {
        !self.output.trim().is_empty()
    }

    /// Cases from the question's examples, paired with their outputs
    pub fn from_question(question: &QuestionData) -> Vec<TestCase> {
        let outputs = question.example_outputs();
        question
            .example_testcase_list
            .iter()
            .enumerate()
            .map(|(idx, example)| TestCase {
                input: example
                    .lines()
                    .map(|line| line.trim_end().to_string())
                    .filter(|line| !line.is_empty())
                    .collect(),
                output: outputs.get(idx).cloned().unwrap_or_default(),
            })
            .collect()
    }

    /// Render cases in the file format
    pub fn format_file(cases: &[TestCase]) -> String {
        cases
            .iter()
            .map(|case| {
                let mut block = String::from(INPUT_HEADER);
                block.push('\n');
                for line in &case.input {
                    block.push_str(line);
                    block.push('\n');
                }
                block.push_str(OUTPUT_HEADER);
                block.push('\n');
                block.push_str(&case.output);
                block.push('\n');
                block
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse the file format; blank lines between blocks are ignored
    pub fn parse_file(text: &str) -> Result<Vec<TestCase>> {
        enum Section {
            None,
            Input,
            Output,
        }

        let mut cases = Vec::new();
        let mut current: Option<TestCase> = None;
        let mut section = Section::None;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim_end();
            match line.trim() {
                INPUT_HEADER => {
                    cases.extend(current.take());
                    current = Some(TestCase::new(Vec::<String>::new(), ""));
                    section = Section::Input;
                }
                OUTPUT_HEADER => match current {
                    Some(_) => section = Section::Output,
                    None => {
                        return Err(LangError::TestCases(format!(
                            "line {}: output without input",
                            idx + 1
                        )))
                    }
                },
                "" => {}
                _ => match (&section, current.as_mut()) {
                    (Section::Input, Some(case)) => case.input.push(line.to_string()),
                    (Section::Output, Some(case)) if case.output.is_empty() => {
                        case.output = line.to_string()
                    }
                    (Section::Output, Some(_)) => {
                        return Err(LangError::TestCases(format!(
                            "line {}: expected output must be a single line",
                            idx + 1
                        )))
                    }
                    _ => {
                        return Err(LangError::TestCases(format!(
                            "line {}: content outside an input block",
                            idx + 1
                        )))
                    }
                },
            }
        }
        cases.extend(current);
        Ok(cases)
    }
}
