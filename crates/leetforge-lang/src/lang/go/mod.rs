//! Go plugin
//!
//! Each question is a `package main` directory with a single `solution.go`
//! holding the solution and a `main()` driver built on the leetgo Go test
//! utilities.

mod decl;
pub mod modifiers;

use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use heck::ToUpperCamelCase;
use leetforge_config::Config;
use leetforge_process::{ProcessConfig, ProcessManager, ProcessOutput};
use tracing::info;

use super::{toolchain_error, BaseLang, Lang};
use crate::{
    codec::AbstractType,
    error::Result,
    harness::{Answer, DirectCall, DriverSynthesizer, InteractiveCall, OUTPUT_SENTINEL},
    mapper::TypeMapper,
    modifier::{ModifierFn, ScriptRunner},
    question::QuestionData,
    result::GenerateResult,
    runner::{LocalTestRunner, TestReport},
};

/// Module providing `Deserialize`, `Serialize` and the array helpers
pub const SUPPORT_MODULE: &str = "github.com/j178/leetgo/testutils/go";

/// Module path of a freshly initialized project
pub const MODULE_PATH: &str = "leetcode-solutions";

const TOOLCHAIN_TIMEOUT_SECS: u64 = 300;

/// Compiled drivers, one executable per question
const BIN_DIR: &str = "bin";

/// Go type spelling
pub struct GoTypes;

impl TypeMapper for GoTypes {
    fn scalar(&self, ty: &AbstractType) -> Option<String> {
        let name = match ty {
            AbstractType::Integer => "int",
            AbstractType::Long => "int64",
            AbstractType::Double => "float64",
            AbstractType::Boolean => "bool",
            AbstractType::Character => "byte",
            AbstractType::String => "string",
            AbstractType::Void => "",
            AbstractType::TreeNode => "*TreeNode",
            AbstractType::ListNode => "*ListNode",
            AbstractType::Array(_) | AbstractType::Other(_) => return None,
        };
        Some(name.to_string())
    }

    fn sequence(&self, inner: &str) -> String {
        format!("[]{inner}")
    }

    fn deserialize_expr(&self, ty: &AbstractType, source: &str) -> String {
        format!("Deserialize[{}]({source})", self.map_type(ty))
    }
}

/// Writes `func main()` drivers
pub struct GoDriver;

impl GoDriver {
    fn print_answer(expr: &str) -> String {
        format!("\tfmt.Println(\"\\n{OUTPUT_SENTINEL} \" + {expr})\n")
    }
}

impl DriverSynthesizer for GoDriver {
    fn direct(&self, call: &DirectCall) -> String {
        let mut code = String::from("func main() {\n\tstdin := bufio.NewReader(os.Stdin)\n");
        if call.params.is_empty() {
            code.push_str("\t_ = stdin\n");
        }
        for param in &call.params {
            code.push_str(&format!(
                "\t{} := {}\n",
                param.name,
                GoTypes.deserialize_expr(&param.ty, "ReadLine(stdin)")
            ));
        }

        let args = call
            .params
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        match &call.answer {
            Answer::Return(_) => code.push_str(&format!("\tans := {}({args})\n", call.function)),
            Answer::Param(idx) => {
                code.push_str(&format!("\t{}({args})\n", call.function));
                code.push_str(&format!("\tans := {}\n", call.params[*idx].name));
            }
        }
        code.push('\n');
        code.push_str(&Self::print_answer("Serialize(ans)"));
        code.push('}');
        code
    }

    fn interactive(&self, call: &InteractiveCall) -> String {
        let mut code = String::from(
            "func main() {\n\
             \tstdin := bufio.NewReader(os.Stdin)\n\
             \tops := Deserialize[[]string](ReadLine(stdin))\n\
             \tparams := MustSplitArray(ReadLine(stdin))\n\
             \toutput := make([]string, 0, len(ops))\n\
             \toutput = append(output, \"null\")\n\n",
        );
        if !call.uses_params() {
            code.push_str("\t_ = params\n");
        }
        if !call.constructor.is_empty() {
            code.push_str("\tconstructorParams := MustSplitArray(params[0])\n");
            for (idx, param) in call.constructor.iter().enumerate() {
                code.push_str(&format!(
                    "\t{} := {}\n",
                    param.name,
                    GoTypes.deserialize_expr(&param.ty, &format!("constructorParams[{idx}]"))
                ));
            }
        }
        let ctor_args = call
            .constructor
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        code.push_str(&format!("\tobj := Constructor({ctor_args})\n\n"));

        code.push_str("\tfor i := 1; i < len(ops); i++ {\n\t\tswitch ops[i] {\n");
        for method in &call.methods {
            code.push_str(&format!("\t\tcase \"{}\":\n", method.name));
            if !method.params.is_empty() {
                code.push_str("\t\t\tmethodParams := MustSplitArray(params[i])\n");
            }
            for (idx, param) in method.params.iter().enumerate() {
                code.push_str(&format!(
                    "\t\t\t{} := {}\n",
                    param.name,
                    GoTypes.deserialize_expr(&param.ty, &format!("methodParams[{idx}]"))
                ));
            }
            let args = method
                .params
                .iter()
                .map(|p| p.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let target = format!("obj.{}({args})", method.name.to_upper_camel_case());
            if method.ret.is_void() {
                code.push_str(&format!("\t\t\t{target}\n\t\t\toutput = append(output, \"null\")\n"));
            } else {
                code.push_str(&format!(
                    "\t\t\tans := Serialize({target})\n\t\t\toutput = append(output, ans)\n"
                ));
            }
        }
        code.push_str("\t\tdefault:\n\t\t\tpanic(\"unknown operation: \" + ops[i])\n");
        code.push_str("\t\t}\n\t}\n");
        code.push_str(&Self::print_answer("JoinArray(output)"));
        code.push('}');
        code
    }
}

/// The Go language plugin
pub struct GoLang {
    base: BaseLang,
    manager: ProcessManager,
}

impl GoLang {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            base: BaseLang::new("go", "golang", "//", "solution.go", config),
            manager: ProcessManager::new(),
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
        format!(
            "package main\n\nimport (\n\t\"bufio\"\n\t\"fmt\"\n\t\"os\"\n\n\t. \"{SUPPORT_MODULE}\"\n)"
        )
    }

    async fn go(&self, out_dir: &Path, args: &[&str]) -> Result<ProcessOutput> {
        let config = ProcessConfig::new("go")
            .args(args.iter().copied())
            .working_dir(out_dir)
            .timeout_secs(TOOLCHAIN_TIMEOUT_SECS);
        Ok(self.manager.run(config).await?)
    }
}

#[async_trait]
impl Lang for GoLang {
    fn slug(&self) -> &'static str {
        "go"
    }

    fn name(&self) -> &'static str {
        "Go"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["golang"]
    }

    fn builtin_modifier(&self, name: &str) -> Option<ModifierFn> {
        modifiers::builtin(name)
    }

    fn generate_paths(&self, question: &QuestionData) -> Result<GenerateResult> {
        self.base.generate_paths(question, &[])
    }

    fn generate(&self, question: &QuestionData) -> Result<GenerateResult> {
        self.base
            .generate(self, question, Self::prelude(), &GoDriver, Vec::new())
    }

    async fn has_initialized(&self, out_dir: &Path) -> Result<bool> {
        if !out_dir.is_dir() {
            return Ok(false);
        }
        let output = self.go(out_dir, &["list", "-m", "-json", SUPPORT_MODULE]).await?;
        if output.success() {
            return Ok(true);
        }
        let text = output.combined();
        if text.contains("not a known dependency") || text.contains("go.mod file not found") {
            Ok(false)
        } else {
            Err(toolchain_error("go list", &output))
        }
    }

    async fn initialize(&self, out_dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(out_dir).await?;

        let init = self.go(out_dir, &["mod", "init", MODULE_PATH]).await?;
        if !init.success() && !init.stderr.contains("go.mod already exists") {
            return Err(toolchain_error("go mod init", &init));
        }
        let get = self.go(out_dir, &["get", SUPPORT_MODULE]).await?;
        if !get.success() {
            return Err(toolchain_error("go get", &get));
        }
        info!(out_dir = %out_dir.display(), module = SUPPORT_MODULE, "go project initialized");
        Ok(())
    }

    async fn local_test(&self, question: &QuestionData, out_dir: &Path) -> Result<TestReport> {
        let sub_dir = self.base.sub_dir(question)?;
        let bin_dir = out_dir.join(BIN_DIR);
        tokio::fs::create_dir_all(&bin_dir).await?;
        let binary = tokio::fs::canonicalize(&bin_dir)
            .await?
            .join(&sub_dir)
            .display()
            .to_string();
        let build = vec![
            "go".to_string(),
            "build".to_string(),
            "-o".to_string(),
            binary.clone(),
            format!("./{sub_dir}"),
        ];
        self.base
            .build_and_run_tests(question, out_dir, build, move |_| Ok(vec![binary]))
            .await
    }
}
