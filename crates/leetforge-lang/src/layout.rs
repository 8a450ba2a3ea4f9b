//! Code file layout: standard blocks in file order
//!
//! `header`, `description`, `title`, `beforeMarker`, then the code region
//! holding `beforeCode`, `code` and `afterCode`, then `afterMarker`. The
//! language's own prelude (package clause, imports) sits right before the
//! code region and its test driver right after it.

use leetforge_config::{Config, ResolvedLangConfig};
use serde_json::Value as Json;

use crate::{
    error::{LangError, Result},
    merge::{Part, CODE_REGION},
    question::QuestionData,
    template::TemplateEngine,
};

/// Everything needed to lay out one code file
pub struct CodeLayout<'a> {
    pub question: &'a QuestionData,
    pub config: &'a Config,
    pub lang: &'a ResolvedLangConfig,
    /// Line comment token of the target language
    pub comment: &'a str,
    /// Language prelude placed before the code region
    pub prelude: String,
    /// Modified solution snippet
    pub code: String,
    /// Test driver placed after the code region
    pub driver: String,
}

impl<'a> CodeLayout<'a> {
    fn template_data(&self) -> Json {
        let mut data = self.question.template_data(&self.lang.slug);
        if let Json::Object(map) = &mut data {
            map.insert("author".into(), Json::String(self.config.author.clone()));
            map.insert(
                "url".into(),
                Json::String(self.question.url(self.config.leetcode.site)),
            );
            map.insert("code".into(), Json::String(self.code.clone()));
        }
        data
    }

    fn configured(&self, name: &str, data: &Json) -> Result<Option<String>> {
        let Some(block) = self.lang.blocks.iter().find(|b| b.name == name) else {
            return Ok(None);
        };
        TemplateEngine::global()
            .render(&block.template, data)
            .map(Some)
            .map_err(|message| LangError::BlockTemplate {
                block: name.to_string(),
                message,
            })
    }

    fn default_block(&self, name: &str) -> String {
        let c = self.comment;
        let q = self.question;
        match name {
            "header" => format!(
                "{c} Created by {}\n{c} {}",
                self.config.author,
                q.url(self.config.leetcode.site)
            ),
            "description" if self.lang.separate_description_file => String::new(),
            "description" => description_comment(q, self.config, c),
            "title" => format!("{c} @lc app=leetforge id={} lang={}", q.id(), self.lang.slug),
            "code" => self.code.clone(),
            _ => String::new(),
        }
    }

    /// Parts of the file, ready for [`crate::merge::assemble`].
    ///
    /// Configured blocks outside the code region become named regions so
    /// hand edits to them survive regeneration.
    pub fn parts(&self) -> Result<Vec<Part>> {
        let data = self.template_data();
        let mut parts = Vec::new();

        let outer = |name: &str, parts: &mut Vec<Part>| -> Result<()> {
            match self.configured(name, &data)? {
                Some(body) => parts.push(Part::region(name, self.comment, body)),
                None => {
                    let text = self.default_block(name);
                    if !text.is_empty() {
                        parts.push(Part::Text(text));
                    }
                }
            }
            Ok(())
        };

        for name in ["header", "description", "title", "beforeMarker"] {
            outer(name, &mut parts)?;
        }
        if !self.prelude.is_empty() {
            parts.push(Part::Text(self.prelude.clone()));
        }

        let mut body = Vec::new();
        for name in ["beforeCode", "code", "afterCode"] {
            let text = match self.configured(name, &data)? {
                Some(text) => text,
                None => self.default_block(name),
            };
            if !text.is_empty() {
                body.push(text);
            }
        }
        parts.push(Part::region(CODE_REGION, self.comment, body.join("\n")));

        if !self.driver.is_empty() {
            parts.push(Part::Text(self.driver.clone()));
        }
        outer("afterMarker", &mut parts)?;
        Ok(parts)
    }
}

/// Description embedded as a comment block
pub fn description_comment(question: &QuestionData, config: &Config, comment: &str) -> String {
    let mut lines = vec![
        format!(
            "{comment} [{}] {}",
            question.id(),
            question.title_for(config.language)
        ),
        format!("{comment} Difficulty: {}", question.difficulty),
        comment.to_string(),
    ];
    for line in question.plain_content(config.language).lines() {
        let line = line.trim_end();
        if line.is_empty() {
            lines.push(comment.to_string());
        } else {
            lines.push(format!("{comment} {line}"));
        }
    }
    while lines.last().is_some_and(|l| l == comment) {
        lines.pop();
    }
    lines.join("\n")
}

/// Contents of the separate `question.md`
pub fn description_markdown(question: &QuestionData, config: &Config) -> String {
    format!(
        "# [{}. {}]({}) ({})\n\n{}\n",
        question.id(),
        question.title_for(config.language),
        question.url(config.leetcode.site),
        question.difficulty,
        question.plain_content(config.language)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{merge::assemble, question::fixtures};
    use leetforge_config::Block;
    use std::path::Path;

    fn layout<'a>(
        q: &'a QuestionData,
        config: &'a Config,
        lang: &'a ResolvedLangConfig,
    ) -> CodeLayout<'a> {
        CodeLayout {
            question: q,
            config,
            lang,
            comment: "//",
            prelude: "package main".to_string(),
            code: "func twoSum() {}".to_string(),
            driver: "func main() {}".to_string(),
        }
    }

    #[test]
    fn test_default_layout_order() {
        let q = fixtures::two_sum();
        let config = Config::default();
        let lang = config.code.resolve("go").unwrap();
        let out = assemble(&layout(&q, &config, &lang).parts().unwrap(), None, Path::new("x")).unwrap();

        let header = out.find("// Created by Bob").unwrap();
        let description = out.find("// [1] Two Sum").unwrap();
        let title = out.find("// @lc app=leetforge id=1 lang=go").unwrap();
        let prelude = out.find("package main").unwrap();
        let code = out.find("// @lc code=begin\nfunc twoSum() {}\n// @lc code=end").unwrap();
        let driver = out.find("func main() {}").unwrap();
        assert!(header < description && description < title);
        assert!(title < prelude && prelude < code && code < driver);
    }

    #[test]
    fn test_separate_description_omits_comment() {
        let q = fixtures::two_sum();
        let mut config = Config::default();
        config.code.separate_description_file = true;
        let lang = config.code.resolve("go").unwrap();
        let parts = layout(&q, &config, &lang).parts().unwrap();
        let out = assemble(&parts, None, Path::new("x")).unwrap();
        assert!(!out.contains("Difficulty"));
    }

    #[test]
    fn test_configured_blocks() {
        let q = fixtures::two_sum();
        let mut config = Config::default();
        config.code.go.blocks = vec![
            Block {
                name: "header".to_string(),
                template: "// {{id}} by {{author}}".to_string(),
            },
            Block {
                name: "afterCode".to_string(),
                template: "// end of {{slug}}".to_string(),
            },
        ];
        let lang = config.code.resolve("go").unwrap();
        let parts = layout(&q, &config, &lang).parts().unwrap();
        assert_eq!(parts[0], Part::region("header", "//", "// 1 by Bob"));

        let out = assemble(&parts, None, Path::new("x")).unwrap();
        assert!(out.contains("// @lc code=begin\nfunc twoSum() {}\n// end of two-sum\n// @lc code=end"));
    }

    #[test]
    fn test_block_template_error() {
        let q = fixtures::two_sum();
        let mut config = Config::default();
        config.code.go.blocks = vec![Block {
            name: "title".to_string(),
            template: "{{missing}}".to_string(),
        }];
        let lang = config.code.resolve("go").unwrap();
        let err = layout(&q, &config, &lang).parts().unwrap_err();
        assert!(matches!(err, LangError::BlockTemplate { block, .. } if block == "title"));
    }

    #[test]
    fn test_description_markdown() {
        let q = fixtures::two_sum();
        let config = Config::default();
        let md = description_markdown(&q, &config);
        assert!(md.starts_with("# [1. Two Sum](https://leetcode.cn/problems/two-sum/) (Easy)\n\n"));
    }
}
