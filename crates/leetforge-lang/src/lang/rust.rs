//! Rust plugin
//!
//! The language output directory is a cargo workspace; every question is a
//! member crate with its own `Cargo.toml` and a `solution.rs` binary.

use std::{collections::BTreeMap, io, path::Path, sync::Arc};

use async_trait::async_trait;
use heck::ToSnakeCase;
use leetforge_config::Config;
use serde::Serialize;
use tracing::info;

use super::{BaseLang, Lang};
use crate::{
    codec::AbstractType,
    error::{LangError, Result},
    harness::{Answer, DirectCall, DriverSynthesizer, InteractiveCall, OUTPUT_SENTINEL},
    mapper::TypeMapper,
    modifier::{remove_useless_comments, ModifierFn, ScriptRunner},
    question::QuestionData,
    result::{FileOutput, FileType, GenerateResult},
    runner::{LocalTestRunner, TestReport},
};

/// Crate providing `read_line`, `deserialize`, `serialize` and the array
/// helpers
pub const SUPPORT_CRATE: &str = "leetgo_rs";

pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Workspace dependencies every question crate inherits
const WORKSPACE_DEPENDENCIES: [(&str, &str); 4] = [
    (SUPPORT_CRATE, "0.2"),
    ("anyhow", "1"),
    ("serde", "1"),
    ("serde_json", "1"),
];

const INDENT: &str = "    ";

/// Rust type spelling
pub struct RustTypes;

impl TypeMapper for RustTypes {
    fn scalar(&self, ty: &AbstractType) -> Option<String> {
        let name = match ty {
            AbstractType::Integer => "i32",
            AbstractType::Long => "i64",
            AbstractType::Double => "f64",
            AbstractType::Boolean => "bool",
            AbstractType::Character => "char",
            AbstractType::String => "String",
            AbstractType::Void => "()",
            AbstractType::TreeNode => "Option<Rc<RefCell<TreeNode>>>",
            AbstractType::ListNode => "Option<Box<ListNode>>",
            AbstractType::Array(_) | AbstractType::Other(_) => return None,
        };
        Some(name.to_string())
    }

    fn sequence(&self, inner: &str) -> String {
        format!("Vec<{inner}>")
    }

    fn deserialize_expr(&self, ty: &AbstractType, source: &str) -> String {
        format!("deserialize::<{}>(&{source})?", self.map_type(ty))
    }
}

/// Writes `fn main()` drivers
pub struct RustDriver;

impl RustDriver {
    fn print_answer(expr: &str) -> String {
        format!("{INDENT}println!(\"\\n{OUTPUT_SENTINEL} {{}}\", {expr});\n{INDENT}Ok(())\n}}")
    }
}

impl DriverSynthesizer for RustDriver {
    fn direct(&self, call: &DirectCall) -> String {
        let output = match call.answer {
            Answer::Param(idx) => Some(idx),
            Answer::Return(_) => None,
        };

        let names: Vec<String> = call.params.iter().map(|p| p.name.to_snake_case()).collect();

        let mut code = String::from("fn main() -> Result<()> {\n");
        for (idx, (param, name)) in call.params.iter().zip(&names).enumerate() {
            let binding = if output == Some(idx) { "let mut" } else { "let" };
            code.push_str(&format!(
                "{INDENT}{binding} {name} = {};\n",
                RustTypes.deserialize_expr(&param.ty, "read_line()?")
            ));
        }

        let args = names
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                if output == Some(idx) {
                    format!("&mut {name}")
                } else {
                    name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        let function = call.function.to_snake_case();
        match output {
            None => code.push_str(&format!("{INDENT}let ans = Solution::{function}({args});\n")),
            Some(idx) => {
                code.push_str(&format!("{INDENT}Solution::{function}({args});\n"));
                code.push_str(&format!("{INDENT}let ans = {};\n", names[idx]));
            }
        }
        code.push('\n');
        code.push_str(&Self::print_answer("serialize(ans)?"));
        code
    }

    fn interactive(&self, call: &InteractiveCall) -> String {
        let mut code = format!(
            "fn main() -> Result<()> {{\n\
             {INDENT}let ops: Vec<String> = deserialize(&read_line()?)?;\n\
             {INDENT}let params = split_array(&read_line()?)?;\n\
             {INDENT}let mut output = Vec::with_capacity(ops.len());\n\
             {INDENT}output.push(\"null\".to_string());\n\n"
        );
        if !call.uses_params() {
            code.push_str(&format!("{INDENT}let _ = &params;\n"));
        }
        if !call.constructor.is_empty() {
            code.push_str(&format!(
                "{INDENT}let constructor_params = split_array(&params[0])?;\n"
            ));
            for (idx, param) in call.constructor.iter().enumerate() {
                code.push_str(&format!(
                    "{INDENT}let {} = {};\n",
                    param.name.to_snake_case(),
                    RustTypes.deserialize_expr(&param.ty, &format!("constructor_params[{idx}]"))
                ));
            }
        }
        let ctor_args = call
            .constructor
            .iter()
            .map(|p| p.name.to_snake_case())
            .collect::<Vec<_>>()
            .join(", ");
        code.push_str(&format!("{INDENT}let mut obj = {}::new({ctor_args});\n\n", call.class));

        let arm = INDENT.repeat(3);
        let body = INDENT.repeat(4);
        code.push_str(&format!(
            "{INDENT}for i in 1..ops.len() {{\n{INDENT}{INDENT}match ops[i].as_str() {{\n"
        ));
        for method in &call.methods {
            code.push_str(&format!("{arm}\"{}\" => {{\n", method.name));
            if !method.params.is_empty() {
                code.push_str(&format!("{body}let method_params = split_array(&params[i])?;\n"));
            }
            for (idx, param) in method.params.iter().enumerate() {
                code.push_str(&format!(
                    "{body}let {} = {};\n",
                    param.name.to_snake_case(),
                    RustTypes.deserialize_expr(&param.ty, &format!("method_params[{idx}]"))
                ));
            }
            let args = method
                .params
                .iter()
                .map(|p| p.name.to_snake_case())
                .collect::<Vec<_>>()
                .join(", ");
            let target = format!("obj.{}({args})", method.name.to_snake_case());
            if method.ret.is_void() {
                code.push_str(&format!(
                    "{body}{target};\n{body}output.push(\"null\".to_string());\n"
                ));
            } else {
                code.push_str(&format!(
                    "{body}let ans = {target};\n{body}output.push(serialize(ans)?);\n"
                ));
            }
            code.push_str(&format!("{arm}}}\n"));
        }
        code.push_str(&format!(
            "{arm}op => anyhow::bail!(\"unknown operation: {{op}}\"),\n{INDENT}{INDENT}}}\n{INDENT}}}\n\n"
        ));
        code.push_str(&Self::print_answer("join_array(output)"));
        code
    }
}

/// Path of the binary cargo reports in its JSON build messages
fn built_executable(messages: &str) -> Result<String> {
    messages
        .lines()
        .filter_map(|line| serde_json::from_str::<serde_json::Value>(line).ok())
        .filter(|msg| msg["reason"] == "compiler-artifact")
        .filter(|msg| {
            msg["target"]["kind"]
                .as_array()
                .is_some_and(|kinds| kinds.iter().any(|k| k == "bin"))
        })
        .filter_map(|msg| msg["executable"].as_str().map(str::to_string))
        .last()
        .ok_or_else(|| LangError::Toolchain {
            command: "cargo build".to_string(),
            message: "no executable in build output".to_string(),
        })
}

#[derive(Serialize)]
struct QuestionManifest<'a> {
    package: PackageSection<'a>,
    bin: Vec<BinTarget<'a>>,
    dependencies: BTreeMap<&'a str, WorkspaceDependency>,
}

#[derive(Serialize)]
struct PackageSection<'a> {
    name: &'a str,
    version: &'a str,
    edition: &'a str,
}

#[derive(Serialize)]
struct BinTarget<'a> {
    name: &'a str,
    path: &'a str,
}

#[derive(Serialize)]
struct WorkspaceDependency {
    workspace: bool,
}

/// Package name of a question crate; names may not start with a digit
fn package_name(sub_dir: &str) -> String {
    let mut name = String::from("question-");
    for c in sub_dir.chars() {
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            name.push(c.to_ascii_lowercase());
        } else {
            name.push('-');
        }
    }
    name
}

/// Manifest of one question crate
fn question_manifest(sub_dir: &str, code_filename: &str) -> Result<String> {
    let name = package_name(sub_dir);
    let manifest = QuestionManifest {
        package: PackageSection {
            name: &name,
            version: "0.1.0",
            edition: "2021",
        },
        bin: vec![BinTarget {
            name: &name,
            path: code_filename,
        }],
        dependencies: WORKSPACE_DEPENDENCIES
            .iter()
            .map(|(dep, _)| (*dep, WorkspaceDependency { workspace: true }))
            .collect(),
    };
    Ok(toml::to_string(&manifest)?)
}

/// Sub-table `key` of `parent`, created when missing
fn table_mut<'t>(parent: &'t mut toml::Table, key: &str, path: &Path) -> Result<&'t mut toml::Table> {
    parent
        .entry(key)
        .or_insert(toml::Value::Table(toml::Table::new()))
        .as_table_mut()
        .ok_or_else(|| LangError::Manifest {
            path: path.to_path_buf(),
            message: format!("`{key}` is not a table"),
        })
}

/// The Rust plugin
pub struct RustLang {
    base: BaseLang,
}

impl RustLang {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            base: BaseLang::new("rust", "rust", "//", "solution.rs", config),
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

    fn prelude(question: &QuestionData) -> String {
        let mut prelude = String::from("use anyhow::Result;\nuse leetgo_rs::*;");
        if !question.meta_data.systemdesign {
            prelude.push_str("\n\nstruct Solution;");
        }
        prelude
    }

    async fn workspace_manifest(out_dir: &Path) -> Result<Option<toml::Table>> {
        match tokio::fs::read_to_string(out_dir.join(MANIFEST_FILE)).await {
            Ok(text) => Ok(Some(toml::from_str(&text)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

fn builtin(name: &str) -> Option<ModifierFn> {
    (name == "removeUselessComments").then_some(remove_useless_comments as ModifierFn)
}

#[async_trait]
impl Lang for RustLang {
    fn slug(&self) -> &'static str {
        "rust"
    }

    fn name(&self) -> &'static str {
        "Rust"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["rs"]
    }

    fn builtin_modifier(&self, name: &str) -> Option<ModifierFn> {
        builtin(name)
    }

    fn generate_paths(&self, question: &QuestionData) -> Result<GenerateResult> {
        self.base
            .generate_paths(question, &[(MANIFEST_FILE, FileType::empty())])
    }

    fn generate(&self, question: &QuestionData) -> Result<GenerateResult> {
        let manifest = question_manifest(&self.base.sub_dir(question)?, self.base.code_filename)?;
        self.base.generate(
            self,
            question,
            Self::prelude(question),
            &RustDriver,
            vec![FileOutput::new(MANIFEST_FILE, manifest, FileType::empty())],
        )
    }

    async fn has_initialized(&self, out_dir: &Path) -> Result<bool> {
        let Some(manifest) = Self::workspace_manifest(out_dir).await? else {
            return Ok(false);
        };
        Ok(manifest
            .get("workspace")
            .and_then(|w| w.get("dependencies"))
            .and_then(|d| d.get(SUPPORT_CRATE))
            .is_some())
    }

    async fn initialize(&self, out_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(out_dir).await?;
        let path = out_dir.join(MANIFEST_FILE);
        let mut manifest = Self::workspace_manifest(out_dir).await?.unwrap_or_default();

        let workspace = table_mut(&mut manifest, "workspace", &path)?;
        workspace
            .entry("members")
            .or_insert(toml::Value::Array(vec!["*".into()]));
        workspace
            .entry("exclude")
            .or_insert(toml::Value::Array(vec!["target".into()]));
        workspace.entry("resolver").or_insert("2".into());

        let dependencies = table_mut(workspace, "dependencies", &path)?;
        for (name, version) in WORKSPACE_DEPENDENCIES {
            dependencies.entry(name).or_insert(version.into());
        }

        tokio::fs::write(&path, toml::to_string(&manifest)?).await?;
        info!(out_dir = %out_dir.display(), dependency = SUPPORT_CRATE, "cargo workspace initialized");
        Ok(())
    }

    async fn local_test(&self, question: &QuestionData, out_dir: &Path) -> Result<TestReport> {
        let build = vec![
            "cargo".to_string(),
            "build".to_string(),
            "--quiet".to_string(),
            "--message-format=json-render-diagnostics".to_string(),
            "--manifest-path".to_string(),
            format!("{}/{MANIFEST_FILE}", self.base.sub_dir(question)?),
        ];
        self.base
            .build_and_run_tests(question, out_dir, build, |output| {
                built_executable(&output.stdout).map(|path| vec![path])
            })
            .await
    }
}
