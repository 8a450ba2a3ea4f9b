//! End-to-end generation through the language registry and the file writer

mod common;

use std::{fs, sync::Arc};

use common::{config, question, COUNT_WAYS, MIN_STACK, TWO_SUM};
use leetforge_config::{Config, Modifier};
use leetforge_lang::{
    FileType, FileWriter, LangError, LangRegistry, QuestionData, ScriptRunner, WriteAction,
};
use tempfile::TempDir;

fn registry(config: Arc<Config>) -> LangRegistry {
    LangRegistry::new(config)
}

#[test]
fn test_generate_and_write_go_solution() {
    let dir = TempDir::new().unwrap();
    let go = registry(config(dir.path())).get("go").unwrap();

    let result = go.generate(&question(TWO_SUM)).unwrap();
    let report = FileWriter::new().write(&result).unwrap();
    assert_eq!(report.written(), 2);

    let target = dir.path().join("go").join("0001.two-sum");
    let code = fs::read_to_string(target.join("solution.go")).unwrap();
    assert!(code.contains("// @lc app=leetforge id=1 lang=go"));
    assert!(code.contains("\tans := twoSum(nums, target)\n"));
    assert!(target.join("testcases.txt").exists());
}

#[test]
fn test_regeneration_preserves_user_code() {
    let dir = TempDir::new().unwrap();
    let go = registry(config(dir.path())).get("go").unwrap();
    let q = question(TWO_SUM);

    let result = go.generate(&q).unwrap();
    FileWriter::new().write(&result).unwrap();
    let path = result.path_for(FileType::CODE_FILE).unwrap();

    let original = fs::read_to_string(&path).unwrap();
    let edited = original.replacen(
        "\treturn\n}",
        "\tseen := map[int]int{}\n\t_ = seen\n\treturn\n}",
        1,
    );
    assert_ne!(original, edited);
    fs::write(&path, &edited).unwrap();

    let regenerated = go.generate(&q).unwrap();
    let code = &regenerated.file_of(FileType::CODE_FILE).unwrap().content;
    assert_eq!(code, &edited);

    let report = FileWriter::new().write(&regenerated).unwrap();
    assert!(report
        .files
        .iter()
        .all(|f| f.action == WriteAction::Unchanged));
}

#[test]
fn test_regeneration_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let python = registry(config(dir.path())).get("py").unwrap();
    let q = question(TWO_SUM);

    let first = python.generate(&q).unwrap();
    FileWriter::new().write(&first).unwrap();
    let second = python.generate(&q).unwrap();
    assert_eq!(first.files(), second.files());
}

#[test]
fn test_unmarked_existing_file_is_left_untouched() {
    let dir = TempDir::new().unwrap();
    let go = registry(config(dir.path())).get("go").unwrap();
    let q = question(TWO_SUM);

    let path = go
        .generate_paths(&q)
        .unwrap()
        .path_for(FileType::CODE_FILE)
        .unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let handwritten = "package main\n\n// my own notes, no markers\n";
    fs::write(&path, handwritten).unwrap();

    let err = go.generate(&q).unwrap_err();
    assert!(matches!(err, LangError::Merge { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), handwritten);
}

#[test]
fn test_interactive_go_solution() {
    let dir = TempDir::new().unwrap();
    let go = registry(config(dir.path())).get("golang").unwrap();

    let result = go.generate(&question(MIN_STACK)).unwrap();
    assert_eq!(result.sub_dir, "0155.min-stack");

    let code = &result.file_of(FileType::CODE_FILE).unwrap().content;
    assert!(code.contains("func Constructor() MinStack {\n\n\treturn MinStack{}\n}"));
    assert!(code.contains("func (m *MinStack) Push(val int) {"));
    assert!(code.contains("func (m *MinStack) GetMin() (ans int) {\n\n\treturn\n}"));
    assert!(!code.contains("will be instantiated"));
    assert!(code.contains("\tobj := Constructor()\n"));
    assert!(code.contains("\t\tcase \"getMin\":\n\t\t\tans := Serialize(obj.GetMin())\n"));
    assert!(code.contains("\t\t\tobj.Pop()\n\t\t\toutput = append(output, \"null\")\n"));

    let cases = &result.file_of(FileType::TEST_CASES_FILE).unwrap().content;
    assert_eq!(
        cases,
        "input:\n[\"MinStack\",\"push\",\"push\",\"push\",\"getMin\",\"pop\",\"getMin\"]\n[[],[-2],[0],[-3],[],[],[]]\noutput:\n[null,null,null,null,-3,null,-2]\n"
    );
}

fn go_with_modifiers(root: &std::path::Path, names: &[&str]) -> Arc<Config> {
    let mut config = Config::default().with_project_root(root);
    config.code.go.modifiers = names.iter().map(|n| Modifier::builtin(*n)).collect();
    Arc::new(config)
}

#[test]
fn test_modifier_order_changes_output() {
    let dir = TempDir::new().unwrap();
    let q = question(COUNT_WAYS);

    let named_first = registry(go_with_modifiers(dir.path(), &["addNamedReturn", "addMod"]))
        .get("go")
        .unwrap()
        .generate(&q)
        .unwrap();
    let code = &named_first.file_of(FileType::CODE_FILE).unwrap().content;
    assert!(code.contains("func countWays(n int) (ans int) {\n\tconst mod = 1e9 + 7\n"));
    assert!(code.contains("\tans = (ans%mod + mod) % mod\n\treturn\n}"));

    let mod_first = registry(go_with_modifiers(dir.path(), &["addMod", "addNamedReturn"]))
        .get("go")
        .unwrap()
        .generate(&q)
        .unwrap();
    let code = &mod_first.file_of(FileType::CODE_FILE).unwrap().content;
    assert!(code.contains("const mod = 1e9 + 7"));
    assert!(!code.contains("ans%mod"));
}

#[test]
fn test_unknown_modifier_fails_generation() {
    let dir = TempDir::new().unwrap();
    let go = registry(go_with_modifiers(dir.path(), &["frobnicate"]))
        .get("go")
        .unwrap();
    let err = go.generate(&question(TWO_SUM)).unwrap_err();
    assert!(matches!(err, LangError::UnknownModifier(name) if name == "frobnicate"));
}

struct Stamp;

impl ScriptRunner for Stamp {
    fn run(
        &self,
        name: &str,
        script: &str,
        code: &str,
        question: &QuestionData,
    ) -> leetforge_lang::Result<String> {
        Ok(format!("// {name} ran `{script}` for {}\n{code}", question.slug))
    }
}

#[test]
fn test_script_modifier_runs_through_runner() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default().with_project_root(dir.path());
    config.code.rust.modifiers = vec![
        Modifier::builtin("removeUselessComments"),
        Modifier {
            name: "stamp".to_string(),
            script: Some("./stamp.sh".to_string()),
        },
    ];
    let rust = LangRegistry::with_script_runner(Arc::new(config), Arc::new(Stamp))
        .get("rust")
        .unwrap();

    let result = rust.generate(&question(TWO_SUM)).unwrap();
    let code = &result.file_of(FileType::CODE_FILE).unwrap().content;
    assert!(code.contains("// @lc code=begin\n// stamp ran `./stamp.sh` for two-sum\nimpl Solution {"));
}

#[test]
fn test_separate_description_file() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default().with_project_root(dir.path());
    config.code.separate_description_file = true;
    let go = registry(Arc::new(config)).get("go").unwrap();

    let result = go.generate(&question(TWO_SUM)).unwrap();
    let doc = result.file_of(FileType::DOC_FILE).unwrap();
    assert_eq!(doc.filename, "question.md");
    assert!(doc.content.starts_with("# [1. 两数之和](https://leetcode.cn/problems/two-sum/) (Easy)"));

    let code = &result.file_of(FileType::CODE_FILE).unwrap().content;
    assert!(!code.contains("Difficulty"));
}

#[test]
fn test_missing_snippet() {
    let dir = TempDir::new().unwrap();
    let python = registry(config(dir.path())).get("python3").unwrap();
    let err = python.generate(&question(COUNT_WAYS)).unwrap_err();
    assert!(matches!(err, LangError::MissingSnippet { .. }));
}

#[tokio::test]
async fn test_local_test_requires_generated_cases() {
    let dir = TempDir::new().unwrap();
    let go = registry(config(dir.path())).get("go").unwrap();
    let err = go
        .local_test(&question(TWO_SUM), &dir.path().join("go"))
        .await
        .unwrap_err();
    assert!(matches!(err, LangError::TestCases(_)));
}
