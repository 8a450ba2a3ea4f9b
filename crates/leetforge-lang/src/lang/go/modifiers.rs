//! Built-in Go modifiers

use crate::{
    modifier::{remove_useless_comments, ModifierFn},
    question::QuestionData,
};

use super::decl::{body_end, FuncDecl};

/// Built-in modifier table for Go
pub fn builtin(name: &str) -> Option<ModifierFn> {
    let apply: ModifierFn = match name {
        "removeUselessComments" => remove_useless_comments,
        "changeReceiverName" => change_receiver_name,
        "addNamedReturn" => add_named_return,
        "addMod" => add_mod,
        _ => return None,
    };
    Some(apply)
}

/// Rename the `this` receiver after the first letter of its type
pub fn change_receiver_name(code: &str, _question: &QuestionData) -> String {
    code.split('\n')
        .map(|line| {
            let Some(decl) = FuncDecl::parse(line) else {
                return line.to_string();
            };
            let renamed = decl
                .receiver
                .and_then(|r| r.strip_prefix("this "))
                .zip(decl.receiver_type().and_then(|ty| ty.chars().next()));
            match renamed {
                Some((rest, first)) => {
                    let receiver = format!("{} {}", first.to_lowercase(), rest.trim_start());
                    let results = decl.results;
                    FuncDecl {
                        receiver: Some(receiver.as_str()),
                        ..decl
                    }
                    .render_with_results(results)
                }
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Name the result `ans` and end the body with a bare `return`.
///
/// `bool` and `string` results are left alone. A system-design
/// `Constructor` instead returns the zero value of its type.
pub fn add_named_return(code: &str, question: &QuestionData) -> String {
    let lines: Vec<&str> = code.split('\n').collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len() + 4);

    let mut idx = 0;
    while idx < lines.len() {
        let line = lines[idx];
        let rewrite = FuncDecl::parse(line).and_then(|decl| {
            let (head, ret) = named_return(line, &decl, question)?;
            Some((head, ret, body_end(&lines, idx)?))
        });
        let Some((head, ret, end)) = rewrite else {
            out.push(line.to_string());
            idx += 1;
            continue;
        };

        out.push(head);
        for body in &lines[idx + 1..end] {
            if body.trim().is_empty() {
                out.push(String::new());
            } else {
                out.push(body.to_string());
            }
        }
        out.push(ret);
        out.push(lines[end].to_string());
        idx = end + 1;
    }
    out.join("\n")
}

fn named_return(line: &str, decl: &FuncDecl<'_>, question: &QuestionData) -> Option<(String, String)> {
    let results = decl.results;
    if results.is_empty() || results == "bool" || results == "string" || results.starts_with('(') {
        return None;
    }
    if question.meta_data.systemdesign && decl.receiver.is_none() && decl.name == "Constructor" {
        return Some((line.to_string(), format!("\treturn {results}{{}}")));
    }
    Some((
        decl.render_with_results(&format!("(ans {results})")),
        "\treturn".to_string(),
    ))
}

/// Declare `mod` in every function and reduce a named integer result into
/// `[0, mod)` before each `return`
pub fn add_mod(code: &str, question: &QuestionData) -> String {
    if question.meta_data.systemdesign || !question.needs_mod() {
        return code.to_string();
    }

    let mut out = Vec::new();
    let mut guarded: Option<String> = None;
    for line in code.split('\n') {
        if let Some(decl) = FuncDecl::parse(line) {
            guarded = decl
                .named_result()
                .filter(|(_, ty)| matches!(*ty, "int" | "int64" | "int32"))
                .map(|(name, _)| name.to_string());
            out.push(line.to_string());
            out.push("\tconst mod = 1e9 + 7".to_string());
            out.push(String::new());
            continue;
        }
        if line.starts_with("\treturn") {
            if let Some(name) = &guarded {
                out.push(format!("\t{name} = ({name}%mod + mod) % mod"));
            }
        }
        out.push(line.to_string());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{fixtures, ReturnSpec};

    fn modular() -> QuestionData {
        let mut q = fixtures::two_sum();
        q.content = "<p>Return the count modulo <code>10<sup>9</sup> + 7</code>.</p>".to_string();
        q.meta_data.name = "countWays".to_string();
        q.meta_data.ret = Some(ReturnSpec {
            ty: "integer".to_string(),
        });
        q
    }

    #[test]
    fn test_builtin_table() {
        for name in ["removeUselessComments", "changeReceiverName", "addNamedReturn", "addMod"] {
            assert!(builtin(name).is_some(), "{name}");
        }
        assert!(builtin("addSemicolons").is_none());
    }

    #[test]
    fn test_change_receiver_name() {
        let q = fixtures::my_class();
        let code = "func (this *MyClass) Push(x int)  {\n\n}\nfunc Constructor() MyClass {";
        assert_eq!(
            change_receiver_name(code, &q),
            "func (m *MyClass) Push(x int) {\n\n}\nfunc Constructor() MyClass {"
        );
    }

    #[test]
    fn test_add_named_return() {
        let q = fixtures::two_sum();
        let code = "func twoSum(nums []int, target int) []int {\n    \n}";
        assert_eq!(
            add_named_return(code, &q),
            "func twoSum(nums []int, target int) (ans []int) {\n\n\treturn\n}"
        );
    }

    #[test]
    fn test_add_named_return_keeps_bool_and_void() {
        let q = fixtures::two_sum();
        let code = "func ok(s string) bool {\n    \n}\nfunc rotate(nums []int, k int)  {\n    \n}";
        assert_eq!(add_named_return(code, &q), code);
    }

    #[test]
    fn test_add_named_return_constructor() {
        let q = fixtures::my_class();
        let code = "func Constructor(capacity int) MyClass {\n\n}\n\n\nfunc (this *MyClass) Pop() int {\n\n}";
        assert_eq!(
            add_named_return(code, &q),
            "func Constructor(capacity int) MyClass {\n\n\treturn MyClass{}\n}\n\n\nfunc (this *MyClass) Pop() (ans int) {\n\n\treturn\n}"
        );
    }

    #[test]
    fn test_add_mod_after_named_return() {
        let q = modular();
        let code = add_named_return("func countWays(n int) int {\n    \n}", &q);
        assert_eq!(
            add_mod(&code, &q),
            "func countWays(n int) (ans int) {\n\tconst mod = 1e9 + 7\n\n\n\tans = (ans%mod + mod) % mod\n\treturn\n}"
        );
    }

    #[test]
    fn test_add_mod_before_named_return_has_no_guard() {
        let q = modular();
        let code = add_mod("func countWays(n int) int {\n    \n}", &q);
        let code = add_named_return(&code, &q);
        assert!(code.contains("const mod = 1e9 + 7"));
        assert!(!code.contains("ans%mod"));
    }

    #[test]
    fn test_add_mod_skips_questions_without_modulus() {
        let q = fixtures::two_sum();
        let code = "func twoSum(nums []int, target int) (ans []int) {\n\treturn\n}";
        assert_eq!(add_mod(code, &q), code);
        assert_eq!(add_mod(code, &fixtures::my_class()), code);
    }
}
