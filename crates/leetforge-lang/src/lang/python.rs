//! Python plugin

use std::{io, path::Path, sync::Arc};

use async_trait::async_trait;
use leetforge_config::Config;
use tracing::info;

use super::{BaseLang, Lang};
use crate::{
    codec::AbstractType,
    error::Result,
    harness::{Answer, DirectCall, DriverSynthesizer, InteractiveCall, OUTPUT_SENTINEL},
    mapper::TypeMapper,
    modifier::{remove_useless_comments, ModifierFn, ScriptRunner},
    question::QuestionData,
    result::GenerateResult,
    runner::{LocalTestRunner, TestReport},
};

/// Distribution providing `read_line`, `deserialize`, `serialize` and the
/// array helpers
pub const SUPPORT_PACKAGE: &str = "leetgo-py";

pub const REQUIREMENTS_FILE: &str = "requirements.txt";

const INDENT: &str = "    ";

/// Python type-hint spelling
pub struct PythonTypes;

impl TypeMapper for PythonTypes {
    fn scalar(&self, ty: &AbstractType) -> Option<String> {
        let name = match ty {
            AbstractType::Integer | AbstractType::Long => "int",
            AbstractType::Double => "float",
            AbstractType::Boolean => "bool",
            AbstractType::Character | AbstractType::String => "str",
            AbstractType::Void => "None",
            AbstractType::TreeNode => "Optional[TreeNode]",
            AbstractType::ListNode => "Optional[ListNode]",
            AbstractType::Array(_) | AbstractType::Other(_) => return None,
        };
        Some(name.to_string())
    }

    fn sequence(&self, inner: &str) -> String {
        format!("List[{inner}]")
    }

    fn deserialize_expr(&self, ty: &AbstractType, source: &str) -> String {
        format!("deserialize(\"{}\", {source})", self.map_type(ty))
    }
}

/// Writes `if __name__ == "__main__":` drivers
pub struct PythonDriver;

impl PythonDriver {
    fn binding(indent: &str, name: &str, ty: &AbstractType, source: &str) -> String {
        format!(
            "{indent}{name}: {} = {}\n",
            PythonTypes.map_type(ty),
            PythonTypes.deserialize_expr(ty, source)
        )
    }
}

impl DriverSynthesizer for PythonDriver {
    fn direct(&self, call: &DirectCall) -> String {
        let mut code = String::from("if __name__ == \"__main__\":\n");
        for param in &call.params {
            code.push_str(&Self::binding(INDENT, &param.name, &param.ty, "read_line()"));
        }

        let args = call
            .params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        match &call.answer {
            Answer::Return(_) => {
                code.push_str(&format!("{INDENT}ans = Solution().{}({args})\n", call.function))
            }
            Answer::Param(idx) => {
                code.push_str(&format!("{INDENT}Solution().{}({args})\n", call.function));
                code.push_str(&format!("{INDENT}ans = {}\n", call.params[*idx].name));
            }
        }
        code.push_str(&format!(
            "\n{INDENT}print(\"\\n{OUTPUT_SENTINEL} \" + serialize(ans))"
        ));
        code
    }

    fn interactive(&self, call: &InteractiveCall) -> String {
        let mut code = format!(
            "if __name__ == \"__main__\":\n\
             {INDENT}ops: List[str] = deserialize(\"List[str]\", read_line())\n\
             {INDENT}params = split_array(read_line())\n\
             {INDENT}output = [\"null\"]\n\n"
        );
        if !call.constructor.is_empty() {
            code.push_str(&format!("{INDENT}constructor_params = split_array(params[0])\n"));
            for (idx, param) in call.constructor.iter().enumerate() {
                code.push_str(&Self::binding(
                    INDENT,
                    &param.name,
                    &param.ty,
                    &format!("constructor_params[{idx}]"),
                ));
            }
        }
        let ctor_args = call
            .constructor
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        code.push_str(&format!("{INDENT}obj = {}({ctor_args})\n\n", call.class));

        code.push_str(&format!("{INDENT}for i in range(1, len(ops)):\n"));
        let body = INDENT.repeat(3);
        for (n, method) in call.methods.iter().enumerate() {
            let keyword = if n == 0 { "if" } else { "elif" };
            code.push_str(&format!(
                "{INDENT}{INDENT}{keyword} ops[i] == \"{}\":\n",
                method.name
            ));
            if !method.params.is_empty() {
                code.push_str(&format!("{body}method_params = split_array(params[i])\n"));
            }
            for (idx, param) in method.params.iter().enumerate() {
                code.push_str(&Self::binding(
                    &body,
                    &param.name,
                    &param.ty,
                    &format!("method_params[{idx}]"),
                ));
            }
            let args = method
                .params
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            if method.ret.is_void() {
                code.push_str(&format!(
                    "{body}obj.{}({args})\n{body}output.append(\"null\")\n",
                    method.name
                ));
            } else {
                code.push_str(&format!(
                    "{body}ans = serialize(obj.{}({args}))\n{body}output.append(ans)\n",
                    method.name
                ));
            }
        }
        let fallback = if call.methods.is_empty() {
            format!("{INDENT}{INDENT}")
        } else {
            format!("{INDENT}{INDENT}else:\n{body}")
        };
        code.push_str(&format!(
            "{fallback}raise ValueError(f\"unknown operation: {{ops[i]}}\")\n"
        ));
        code.push_str(&format!(
            "\n{INDENT}print(\"\\n{OUTPUT_SENTINEL} \" + join_array(output))"
        ));
        code
    }
}

fn builtin(name: &str) -> Option<ModifierFn> {
    (name == "removeUselessComments").then_some(remove_useless_comments as ModifierFn)
}

/// Whether a requirements line names the support package
fn declares_support_package(line: &str) -> bool {
    let line = line.trim();
    if line.starts_with('#') {
        return false;
    }
    let name_end = line
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '.'))
        .unwrap_or(line.len());
    line[..name_end].to_lowercase().replace('_', "-") == SUPPORT_PACKAGE
}

/// The Python plugin
pub struct PythonLang {
    base: BaseLang,
}

impl PythonLang {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            base: BaseLang::new("python3", "python3", "#", "solution.py", config),
        }
    }

    pub fn with_script_runner(mut self, scripts: Arc<dyn ScriptRunner>) -> Self {
        self.base.scripts = scripts;
        self
    }

    pub fn with_test_runner(mut self, runner: LocalTestRunner) -> Self {
        self.base.runner = runner;
        self
    }

    fn prelude() -> String {
        "from typing import *\n\nfrom leetgo_py import *".to_string()
    }

    async fn requirements(out_dir: &Path) -> Result<Option<String>> {
        match tokio::fs::read_to_string(out_dir.join(REQUIREMENTS_FILE)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl Lang for PythonLang {
    fn slug(&self) -> &'static str {
        "python3"
    }

    fn name(&self) -> &'static str {
        "Python"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["python", "py"]
    }

    fn builtin_modifier(&self, name: &str) -> Option<ModifierFn> {
        builtin(name)
    }

    fn generate_paths(&self, question: &QuestionData) -> Result<GenerateResult> {
        self.base.generate_paths(question, &[])
    }

    fn generate(&self, question: &QuestionData) -> Result<GenerateResult> {
        self.base
            .generate(self, question, Self::prelude(), &PythonDriver, Vec::new())
    }

    async fn has_initialized(&self, out_dir: &Path) -> Result<bool> {
        Ok(Self::requirements(out_dir)
            .await?
            .is_some_and(|text| text.lines().any(declares_support_package)))
    }

    async fn initialize(&self, out_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(out_dir).await?;
        let mut text = Self::requirements(out_dir).await?.unwrap_or_default();
        if text.lines().any(declares_support_package) {
            return Ok(());
        }
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text.push_str(SUPPORT_PACKAGE);
        text.push('\n');
        tokio::fs::write(out_dir.join(REQUIREMENTS_FILE), text).await?;
        info!(out_dir = %out_dir.display(), package = SUPPORT_PACKAGE, "python project initialized");
        Ok(())
    }

    async fn local_test(&self, question: &QuestionData, out_dir: &Path) -> Result<TestReport> {
        let argv = vec![
            "python3".to_string(),
            format!("{}/solution.py", self.base.sub_dir(question)?),
        ];
        self.base.run_tests(question, out_dir, argv).await
    }
}
