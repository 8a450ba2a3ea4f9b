//! Shared question fixtures, in the JSON shape the question service returns

#![allow(dead_code)]

use std::{path::Path, sync::Arc};

use leetforge_config::Config;
use leetforge_lang::QuestionData;

pub const TWO_SUM: &str = r#"{
    "questionId": "1",
    "questionFrontendId": "1",
    "title": "Two Sum",
    "translatedTitle": "两数之和",
    "titleSlug": "two-sum",
    "difficulty": "Easy",
    "content": "<p>Given an array <code>nums</code> and an integer <code>target</code>.</p>\n<pre>\n<strong>Input:</strong> nums = [2,7,11,15], target = 9\n<strong>Output:</strong> [0,1]\n</pre>\n<pre>\n<strong>Input:</strong> nums = [3,2,4], target = 6\n<strong>Output:</strong> [1,2]\n</pre>",
    "translatedContent": "",
    "codeSnippets": [
        {"lang": "Go", "langSlug": "golang", "code": "func twoSum(nums []int, target int) []int {\n    \n}"},
        {"lang": "Python3", "langSlug": "python3", "code": "class Solution:\n    def twoSum(self, nums: List[int], target: int) -> List[int]:\n        "},
        {"lang": "Rust", "langSlug": "rust", "code": "impl Solution {\n    pub fn two_sum(nums: Vec<i32>, target: i32) -> Vec<i32> {\n        \n    }\n}"}
    ],
    "exampleTestcaseList": ["[2,7,11,15]\n9", "[3,2,4]\n6"],
    "metaData": "{\"name\":\"twoSum\",\"params\":[{\"name\":\"nums\",\"type\":\"integer[]\"},{\"name\":\"target\",\"type\":\"integer\"}],\"return\":{\"type\":\"integer[]\",\"size\":2}}"
}"#;

pub const MIN_STACK: &str = r#"{
    "questionId": "155",
    "questionFrontendId": "155",
    "title": "Min Stack",
    "titleSlug": "min-stack",
    "difficulty": "Medium",
    "content": "<p>Design a stack.</p>\n<strong>Output:</strong> [null,null,null,null,-3,null,-2]",
    "codeSnippets": [
        {"lang": "Go", "langSlug": "golang", "code": "type MinStack struct {\n\n}\n\n\nfunc Constructor() MinStack {\n\n}\n\n\nfunc (this *MinStack) Push(val int)  {\n\n}\n\n\nfunc (this *MinStack) Pop()  {\n\n}\n\n\nfunc (this *MinStack) GetMin() int {\n\n}\n\n\n/**\n * Your MinStack object will be instantiated and called as such:\n * obj := Constructor();\n * obj.Push(val);\n * obj.Pop();\n * param_4 := obj.GetMin();\n */"}
    ],
    "exampleTestcaseList": ["[\"MinStack\",\"push\",\"push\",\"push\",\"getMin\",\"pop\",\"getMin\"]\n[[],[-2],[0],[-3],[],[],[]]"],
    "metaData": {
        "classname": "MinStack",
        "constructor": {"params": []},
        "methods": [
            {"name": "push", "params": [{"name": "val", "type": "integer"}], "return": {"type": "void"}},
            {"name": "pop", "params": [], "return": {"type": "void"}},
            {"name": "getMin", "params": [], "return": {"type": "integer"}}
        ],
        "systemdesign": true
    }
}"#;

pub const COUNT_WAYS: &str = r#"{
    "questionId": "70",
    "questionFrontendId": "70",
    "title": "Count Ways",
    "titleSlug": "count-ways",
    "difficulty": "Easy",
    "content": "<p>Return the answer modulo <code>10<sup>9</sup> + 7</code>.</p>\n<strong>Output:</strong> 2",
    "codeSnippets": [
        {"lang": "Go", "langSlug": "golang", "code": "func countWays(n int) int {\n    \n}"}
    ],
    "exampleTestcaseList": ["2"],
    "metaData": {"name": "countWays", "params": [{"name": "n", "type": "integer"}], "return": {"type": "integer"}}
}"#;

pub fn question(json: &str) -> QuestionData {
    QuestionData::from_json(json).expect("fixture question parses")
}

pub fn config(root: &Path) -> Arc<Config> {
    Arc::new(Config::default().with_project_root(root))
}
