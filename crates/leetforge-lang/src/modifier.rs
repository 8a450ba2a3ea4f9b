//! Modifier pipeline
//!
//! Modifiers are text transforms over the freshly rendered solution code,
//! applied strictly in configured order. Built-in modifiers come from the
//! language plugin's static table; modifiers carrying a script are handed to
//! a [`ScriptRunner`]. Preserved user code never passes through here.

use std::sync::Arc;

use leetforge_config::Modifier;
use leetforge_process::{ProcessConfig, ProcessManager};
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{LangError, Result},
    question::QuestionData,
};

/// A built-in modifier
pub type ModifierFn = fn(&str, &QuestionData) -> String;

/// Runs externally scripted modifiers: code and question in, code out
pub trait ScriptRunner: Send + Sync {
    fn run(&self, name: &str, script: &str, code: &str, question: &QuestionData) -> Result<String>;
}

#[derive(Serialize)]
struct ScriptInput<'a> {
    name: &'a str,
    code: &'a str,
    question: &'a QuestionData,
}

/// Runs scripts with `sh -c`, passing `{"name", "code", "question"}` as JSON
/// on stdin and reading the transformed code from stdout.
#[derive(Debug, Clone)]
pub struct CommandScriptRunner {
    manager: ProcessManager,
}

impl CommandScriptRunner {
    pub fn new() -> Self {
        Self {
            manager: ProcessManager::new(),
        }
    }
}

impl Default for CommandScriptRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptRunner for CommandScriptRunner {
    fn run(&self, name: &str, script: &str, code: &str, question: &QuestionData) -> Result<String> {
        let input = serde_json::to_string(&ScriptInput {
            name,
            code,
            question,
        })?;
        let config = ProcessConfig::new("sh")
            .args(["-c", script])
            .stdin(input);

        let output = self
            .manager
            .run_blocking(&config)
            .map_err(|e| LangError::Script {
                name: name.to_string(),
                message: e.to_string(),
            })?;
        if !output.success() {
            return Err(LangError::Script {
                name: name.to_string(),
                message: format!(
                    "exited with {:?}: {}",
                    output.exit_code,
                    output.stderr.trim()
                ),
            });
        }
        Ok(output.stdout)
    }
}

enum Step {
    Builtin { name: String, apply: ModifierFn },
    Script { name: String, script: String },
}

/// Resolved, ordered list of modifiers
pub struct ModifierPipeline {
    steps: Vec<Step>,
    scripts: Arc<dyn ScriptRunner>,
}

impl ModifierPipeline {
    /// Resolve configured modifiers against a language's built-in table.
    ///
    /// A modifier with a script always runs the script. Names that are
    /// neither scripted nor built in fail with [`LangError::UnknownModifier`].
    pub fn resolve<F>(
        modifiers: &[Modifier],
        builtin: F,
        scripts: Arc<dyn ScriptRunner>,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<ModifierFn>,
    {
        let steps = modifiers
            .iter()
            .map(|m| match &m.script {
                Some(script) => Ok(Step::Script {
                    name: m.name.clone(),
                    script: script.clone(),
                }),
                None => builtin(&m.name)
                    .map(|apply| Step::Builtin {
                        name: m.name.clone(),
                        apply,
                    })
                    .ok_or_else(|| LangError::UnknownModifier(m.name.clone())),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps, scripts })
    }

    pub fn names(&self) -> Vec<&str> {
        self.steps
            .iter()
            .map(|step| match step {
                Step::Builtin { name, .. } | Step::Script { name, .. } => name.as_str(),
            })
            .collect()
    }

    /// Apply every step in order
    pub fn apply(&self, code: &str, question: &QuestionData) -> Result<String> {
        let mut code = code.to_string();
        for step in &self.steps {
            code = match step {
                Step::Builtin { name, apply } => {
                    debug!(modifier = %name, question = %question.slug, "applying modifier");
                    apply(&code, question)
                }
                Step::Script { name, script } => {
                    debug!(modifier = %name, question = %question.slug, "running modifier script");
                    self.scripts.run(name, script, &code, question)?
                }
            };
        }
        Ok(code)
    }
}

/// Drop snippet comments that only document the judge's scaffolding: node
/// definitions and "will be instantiated" usage notes.
pub fn remove_useless_comments(code: &str, _question: &QuestionData) -> String {
    let lines: Vec<&str> = code.lines().collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());
    let mut idx = 0;

    while idx < lines.len() {
        let trimmed = lines[idx].trim_start();
        let end = if trimmed.starts_with("/*") {
            (idx..lines.len())
                .find(|&j| lines[j].contains("*/"))
                .unwrap_or(lines.len() - 1)
        } else if let Some(prefix) = ["//", "#"].into_iter().find(|p| trimmed.starts_with(p)) {
            let mut end = idx;
            while end + 1 < lines.len() && lines[end + 1].trim_start().starts_with(prefix) {
                end += 1;
            }
            end
        } else {
            kept.push(lines[idx]);
            idx += 1;
            continue;
        };

        let group = &lines[idx..=end];
        let scaffolding = group
            .iter()
            .any(|l| l.contains("Definition for") || l.contains("object will be instantiated"));
        if !scaffolding {
            kept.extend_from_slice(group);
        }
        idx = end + 1;
    }

    while kept.first().is_some_and(|l| l.trim().is_empty()) {
        kept.remove(0);
    }
    while kept.last().is_some_and(|l| l.trim().is_empty()) {
        kept.pop();
    }
    kept.join("\n")
}
