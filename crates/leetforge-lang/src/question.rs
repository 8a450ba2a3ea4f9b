//! Question data consumed by the generators
//!
//! [`QuestionData`] mirrors the JSON the question service returns. It is
//! immutable for the duration of a generation pass.

use std::{collections::HashSet, fs, path::Path};

use leetforge_config::{Language, LeetcodeSite};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::json;

use crate::{
    codec::AbstractType,
    error::{LangError, Result},
    template::TemplateEngine,
};

/// A typed parameter in question metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    pub fn abstract_type(&self) -> AbstractType {
        AbstractType::parse(&self.ty)
    }
}

/// Declared return of a function or method
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReturnSpec {
    #[serde(rename = "type")]
    pub ty: String,
}

/// Answer communicated through a mutated parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSpec {
    pub paramindex: usize,
}

/// Constructor of an interactive question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructorSpec {
    pub params: Vec<Param>,
}

/// Callable method of an interactive question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodSpec {
    pub name: String,
    pub params: Vec<Param>,
    #[serde(rename = "return")]
    pub ret: ReturnSpec,
}

/// Call shape of a question
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaData {
    pub name: String,
    pub params: Vec<Param>,
    #[serde(rename = "return", skip_serializing_if = "Option::is_none")]
    pub ret: Option<ReturnSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<OutputSpec>,
    /// Interactive/stateful question driven by operation sequences
    pub systemdesign: bool,
    pub classname: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constructor: Option<ConstructorSpec>,
    pub methods: Vec<MethodSpec>,
    /// Harness cannot be synthesized
    pub manual: bool,
}

impl MetaData {
    /// Declared return type, `void` when absent
    pub fn return_type(&self) -> AbstractType {
        self.ret
            .as_ref()
            .map(|r| AbstractType::parse(&r.ty))
            .unwrap_or(AbstractType::Void)
    }

    pub fn constructor_params(&self) -> &[Param] {
        self.constructor
            .as_ref()
            .map(|c| c.params.as_slice())
            .unwrap_or_default()
    }
}

/// Code template for one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeSnippet {
    pub lang: String,
    pub lang_slug: String,
    pub code: String,
}

/// A question as delivered by the question service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuestionData {
    pub question_id: String,
    pub question_frontend_id: String,
    pub title: String,
    pub translated_title: String,
    #[serde(rename = "titleSlug")]
    pub slug: String,
    pub difficulty: String,
    pub content: String,
    pub translated_content: String,
    pub code_snippets: Vec<CodeSnippet>,
    pub example_testcase_list: Vec<String>,
    #[serde(deserialize_with = "meta_data_from_string_or_object")]
    pub meta_data: MetaData,
}

/// `metaData` arrives as an embedded JSON string from the API and as an
/// object from cached files
fn meta_data_from_string_or_object<'de, D>(
    deserializer: D,
) -> std::result::Result<MetaData, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    match raw {
        serde_json::Value::String(s) if s.trim().is_empty() => Ok(MetaData::default()),
        serde_json::Value::String(s) => serde_json::from_str(&s).map_err(serde::de::Error::custom),
        serde_json::Value::Null => Ok(MetaData::default()),
        other => serde_json::from_value(other).map_err(serde::de::Error::custom),
    }
}

static MOD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"10\s*\^\s*9\s*\+\s*7|10<sup>9</sup>\s*\+\s*7|1e9\s*\+\s*7|1000000007|10⁹\s*\+\s*7",
    )
    .unwrap()
});

static OUTPUT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<strong>\s*(?:Output|输出)\s*[:：]?\s*</strong>\s*[:：]?\s*([^\n<]*)").unwrap()
});

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*(\n[ \t]*)+\n").unwrap());

impl QuestionData {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Id shown to users, falling back to the internal id
    pub fn id(&self) -> &str {
        if self.question_frontend_id.is_empty() {
            &self.question_id
        } else {
            &self.question_frontend_id
        }
    }

    pub fn title_for(&self, language: Language) -> &str {
        match language {
            Language::Zh if !self.translated_title.is_empty() => &self.translated_title,
            _ => &self.title,
        }
    }

    pub fn content_for(&self, language: Language) -> &str {
        match language {
            Language::Zh if !self.translated_content.is_empty() => &self.translated_content,
            _ if self.content.is_empty() => &self.translated_content,
            _ => &self.content,
        }
    }

    pub fn url(&self, site: LeetcodeSite) -> String {
        format!("{}/problems/{}/", site.base_url(), self.slug)
    }

    /// Code template for a snippet slug such as `golang` or `python3`
    pub fn snippet(&self, lang_slug: &str) -> Option<&str> {
        self.code_snippets
            .iter()
            .find(|s| s.lang_slug == lang_slug)
            .map(|s| s.code.as_str())
    }

    /// Whether the description asks for answers modulo 1e9 + 7
    pub fn needs_mod(&self) -> bool {
        MOD_PATTERN.is_match(&self.content) || MOD_PATTERN.is_match(&self.translated_content)
    }

    /// Expected outputs of the examples, in description order
    pub fn example_outputs(&self) -> Vec<String> {
        let source = if OUTPUT_PATTERN.is_match(&self.content) {
            &self.content
        } else {
            &self.translated_content
        };
        OUTPUT_PATTERN
            .captures_iter(source)
            .map(|caps| unescape_html(caps[1].trim()))
            .collect()
    }

    /// Random-looking slugs carry no information and are left out of filenames
    pub fn slug_is_meaningful(&self) -> bool {
        !self.slug.is_empty()
            && !self.slug.chars().any(|c| c.is_ascii_uppercase())
            && !self.slug.chars().all(|c| c.is_ascii_digit())
    }

    /// Attributes available to filename and block templates
    pub fn template_data(&self, lang: &str) -> serde_json::Value {
        json!({
            "id": self.id(),
            "slug": self.slug,
            "title": self.title,
            "difficulty": self.difficulty,
            "lang": lang,
            "slug_is_meaningful": self.slug_is_meaningful(),
        })
    }

    /// Render the filename template for a language
    pub fn formatted_filename(&self, lang: &str, template: &str) -> Result<String> {
        TemplateEngine::global()
            .render(template, &self.template_data(lang))
            .map_err(|message| LangError::FilenameTemplate {
                template: template.to_string(),
                message,
            })
    }

    /// Description as plain text, HTML tags stripped and entities decoded
    pub fn plain_content(&self, language: Language) -> String {
        let stripped = TAG_PATTERN.replace_all(self.content_for(language), "");
        let text = unescape_html(&stripped).replace('\r', "");
        BLANK_RUNS.replace_all(&text, "\n\n").trim().to_string()
    }

    /// Reject metadata no harness can be synthesized for
    pub fn validate_meta(&self) -> Result<()> {
        let meta = &self.meta_data;
        let question = self.slug.as_str();

        if meta.manual {
            return Err(LangError::metadata(
                question,
                "question requires a hand-written harness",
            ));
        }

        if meta.systemdesign {
            if meta.classname.is_empty() {
                return Err(LangError::metadata(question, "interactive question without classname"));
            }
            if meta.methods.is_empty() {
                return Err(LangError::metadata(question, "interactive question without methods"));
            }
            check_params(question, "constructor", meta.constructor_params())?;
            let mut seen = HashSet::new();
            for method in &meta.methods {
                if method.name.is_empty() {
                    return Err(LangError::metadata(question, "method without a name"));
                }
                if !seen.insert(method.name.as_str()) {
                    return Err(LangError::metadata(
                        question,
                        format!("method {} declared twice", method.name),
                    ));
                }
                check_params(question, &method.name, &method.params)?;
            }
            return Ok(());
        }

        if meta.name.is_empty() {
            return Err(LangError::metadata(question, "function name is empty"));
        }
        check_params(question, &meta.name, &meta.params)?;

        if meta.return_type().is_void() {
            match meta.output {
                Some(output) if output.paramindex < meta.params.len() => {}
                Some(output) => {
                    return Err(LangError::metadata(
                        question,
                        format!(
                            "output parameter index {} out of range for {} parameters",
                            output.paramindex,
                            meta.params.len()
                        ),
                    ))
                }
                None => {
                    return Err(LangError::metadata(
                        question,
                        "function returns void and declares no output parameter",
                    ))
                }
            }
        }
        Ok(())
    }
}

fn check_params(question: &str, owner: &str, params: &[Param]) -> Result<()> {
    let mut seen = HashSet::new();
    for param in params {
        if param.name.is_empty() || param.ty.is_empty() {
            return Err(LangError::metadata(
                question,
                format!("{owner}: parameter without name or type"),
            ));
        }
        if !seen.insert(param.name.as_str()) {
            return Err(LangError::metadata(
                question,
                format!("{owner}: duplicate parameter {}", param.name),
            ));
        }
    }
    Ok(())
}

fn unescape_html(text: &str) -> String {
    text.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Direct-call question returning its answer
    pub fn two_sum() -> QuestionData {
        QuestionData {
            question_id: "1".to_string(),
            question_frontend_id: "1".to_string(),
            title: "Two Sum".to_string(),
            slug: "two-sum".to_string(),
            difficulty: "Easy".to_string(),
            content: "<p>Given an array of integers <code>nums</code>&nbsp;and an integer <code>target</code>.</p>\n\
                <pre>\n<strong>Input:</strong> nums = [2,7,11,15], target = 9\n<strong>Output:</strong> [0,1]\n</pre>\n\
                <pre>\n<strong>Input:</strong> nums = [3,2,4], target = 6\n<strong>Output:</strong> [1,2]\n</pre>"
                .to_string(),
            code_snippets: vec![
                CodeSnippet {
                    lang: "Go".to_string(),
                    lang_slug: "golang".to_string(),
                    code: "func twoSum(nums []int, target int) []int {\n    \n}".to_string(),
                },
                CodeSnippet {
                    lang: "Python3".to_string(),
                    lang_slug: "python3".to_string(),
                    code: "class Solution:\n    def twoSum(self, nums: List[int], target: int) -> List[int]:\n        ".to_string(),
                },
                CodeSnippet {
                    lang: "Rust".to_string(),
                    lang_slug: "rust".to_string(),
                    code: "impl Solution {\n    pub fn two_sum(nums: Vec<i32>, target: i32) -> Vec<i32> {\n        \n    }\n}".to_string(),
                },
            ],
            example_testcase_list: vec!["[2,7,11,15]\n9".to_string(), "[3,2,4]\n6".to_string()],
            meta_data: MetaData {
                name: "twoSum".to_string(),
                params: vec![Param::new("nums", "integer[]"), Param::new("target", "integer")],
                ret: Some(ReturnSpec {
                    ty: "integer[]".to_string(),
                }),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Interactive question with a constructor argument
    pub fn my_class() -> QuestionData {
        QuestionData {
            question_id: "9001".to_string(),
            question_frontend_id: "9001".to_string(),
            title: "My Class".to_string(),
            slug: "my-class".to_string(),
            difficulty: "Medium".to_string(),
            content: "<p>Design a stack.</p>\n<strong>Output:</strong> [null,null,3]".to_string(),
            code_snippets: vec![CodeSnippet {
                lang: "Go".to_string(),
                lang_slug: "golang".to_string(),
                code: "type MyClass struct {\n\n}\n\n\nfunc Constructor(capacity int) MyClass {\n\n}\n\n\nfunc (this *MyClass) Push(x int)  {\n\n}\n\n\nfunc (this *MyClass) Pop() int {\n\n}\n\n\n/**\n * Your MyClass object will be instantiated and called as such:\n * obj := Constructor(capacity);\n * obj.Push(x);\n * param_2 := obj.Pop();\n */".to_string(),
            }],
            example_testcase_list: vec![
                "[\"MyClass\",\"push\",\"pop\"]\n[[5],[3],[]]".to_string(),
            ],
            meta_data: MetaData {
                systemdesign: true,
                classname: "MyClass".to_string(),
                constructor: Some(ConstructorSpec {
                    params: vec![Param::new("capacity", "integer")],
                }),
                methods: vec![
                    MethodSpec {
                        name: "push".to_string(),
                        params: vec![Param::new("x", "integer")],
                        ret: ReturnSpec {
                            ty: "void".to_string(),
                        },
                    },
                    MethodSpec {
                        name: "pop".to_string(),
                        params: vec![],
                        ret: ReturnSpec {
                            ty: "integer".to_string(),
                        },
                    },
                ],
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Direct-call question answering through a mutated parameter, modulo 1e9+7
    pub fn rotate() -> QuestionData {
        QuestionData {
            question_id: "189".to_string(),
            question_frontend_id: "189".to_string(),
            title: "Rotate Array".to_string(),
            slug: "rotate-array".to_string(),
            difficulty: "Medium".to_string(),
            content: "<p>Rotate <code>nums</code>.</p>".to_string(),
            code_snippets: vec![CodeSnippet {
                lang: "Go".to_string(),
                lang_slug: "golang".to_string(),
                code: "func rotate(nums []int, k int)  {\n    \n}".to_string(),
            }],
            example_testcase_list: vec!["[1,2,3]\n1".to_string()],
            meta_data: MetaData {
                name: "rotate".to_string(),
                params: vec![Param::new("nums", "integer[]"), Param::new("k", "integer")],
                ret: Some(ReturnSpec {
                    ty: "void".to_string(),
                }),
                output: Some(OutputSpec { paramindex: 0 }),
                ..Default::default()
            },
            ..Default::default()
        }
    }
}
