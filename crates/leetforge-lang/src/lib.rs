//! Solution scaffolding for coding-challenge questions
//!
//! Given a question's metadata and code snippets, a language plugin renders
//! a solution file with a test driver around the user's code, regenerates it
//! without losing hand edits between `@lc` markers, and runs the driver
//! locally against the question's examples.

pub mod codec;
pub mod error;
pub mod harness;
pub mod lang;
pub mod layout;
pub mod mapper;
pub mod merge;
pub mod modifier;
pub mod question;
pub mod result;
pub mod runner;
pub mod template;
pub mod testcase;
pub mod writer;

pub use codec::{AbstractType, Value};
pub use error::{LangError, Result};
pub use harness::{extract_answer, HarnessPlan, OUTPUT_SENTINEL};
pub use lang::{GoLang, Lang, LangRegistry, PythonLang, RustLang};
pub use modifier::{CommandScriptRunner, ModifierFn, ModifierPipeline, ScriptRunner};
pub use question::QuestionData;
pub use result::{FileOutput, FileType, GenerateResult};
pub use runner::{CaseResult, LocalTestRunner, Outcome, TestReport};
pub use testcase::TestCase;
pub use writer::{FileWriter, WriteAction, WriteReport};
