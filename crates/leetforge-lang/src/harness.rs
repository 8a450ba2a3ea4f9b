//! Test-harness synthesis
//!
//! Generated drivers read serialized inputs from stdin, call the solution
//! and print exactly one sentinel line:
//!
//! ```text
//! leetforge-output: <serialized answer>
//! ```
//!
//! Everything else on stdout is noise to the runner.

use crate::{
    codec::AbstractType,
    error::{LangError, Result},
    question::{Param, QuestionData},
};

/// Token prefixing the answer line of every driver
pub const OUTPUT_SENTINEL: &str = "leetforge-output:";

/// Answer line as a driver prints it
pub fn sentinel_line(answer: &str) -> String {
    format!("{OUTPUT_SENTINEL} {answer}")
}

/// Payload of the last sentinel line in `stdout`
pub fn extract_answer(stdout: &str) -> Option<&str> {
    stdout.lines().rev().find_map(|line| {
        let line = line.trim_end_matches('\r');
        line.strip_prefix(OUTPUT_SENTINEL)
            .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
    })
}

/// Parameter with its parsed type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedParam {
    pub name: String,
    pub ty: AbstractType,
}

impl From<&Param> for TypedParam {
    fn from(param: &Param) -> Self {
        Self {
            name: param.name.clone(),
            ty: param.abstract_type(),
        }
    }
}

/// Where a direct call's answer comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Return(AbstractType),
    /// Index into the parameters, read back after the call
    Param(usize),
}

/// Single function call: one input line per parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectCall {
    pub function: String,
    pub params: Vec<TypedParam>,
    pub answer: Answer,
}

impl DirectCall {
    /// Type of the serialized answer
    pub fn answer_type(&self) -> &AbstractType {
        match &self.answer {
            Answer::Return(ty) => ty,
            Answer::Param(idx) => &self.params[*idx].ty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub name: String,
    pub params: Vec<TypedParam>,
    pub ret: AbstractType,
}

/// Stateful object driven by an operations line and an arguments line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveCall {
    pub class: String,
    pub constructor: Vec<TypedParam>,
    pub methods: Vec<MethodCall>,
}

impl InteractiveCall {
    /// Whether any call reads from the arguments line
    pub fn uses_params(&self) -> bool {
        !self.constructor.is_empty() || self.methods.iter().any(|m| !m.params.is_empty())
    }
}

/// Validated call shape of a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessPlan {
    Direct(DirectCall),
    Interactive(InteractiveCall),
}

impl HarnessPlan {
    /// Build the plan, failing on metadata no driver can be written for
    pub fn from_question(question: &QuestionData) -> Result<Self> {
        question.validate_meta()?;
        let meta = &question.meta_data;

        if meta.systemdesign {
            return Ok(HarnessPlan::Interactive(InteractiveCall {
                class: meta.classname.clone(),
                constructor: meta.constructor_params().iter().map(TypedParam::from).collect(),
                methods: meta
                    .methods
                    .iter()
                    .map(|m| MethodCall {
                        name: m.name.clone(),
                        params: m.params.iter().map(TypedParam::from).collect(),
                        ret: AbstractType::parse(&m.ret.ty),
                    })
                    .collect(),
            }));
        }

        let ret = meta.return_type();
        let answer = if ret.is_void() {
            let idx = meta
                .output
                .map(|o| o.paramindex)
                .ok_or_else(|| LangError::metadata(&question.slug, "missing output parameter"))?;
            Answer::Param(idx)
        } else {
            Answer::Return(ret)
        };
        Ok(HarnessPlan::Direct(DirectCall {
            function: meta.name.clone(),
            params: meta.params.iter().map(TypedParam::from).collect(),
            answer,
        }))
    }

    /// Answer type for direct calls; interactive answers are lists of
    /// mixed serialized values
    pub fn answer_type(&self) -> Option<&AbstractType> {
        match self {
            HarnessPlan::Direct(call) => Some(call.answer_type()),
            HarnessPlan::Interactive(_) => None,
        }
    }
}

/// Writes driver source for one target language
pub trait DriverSynthesizer {
    fn direct(&self, call: &DirectCall) -> String;
    fn interactive(&self, call: &InteractiveCall) -> String;

    fn synthesize(&self, plan: &HarnessPlan) -> String {
        match plan {
            HarnessPlan::Direct(call) => self.direct(call),
            HarnessPlan::Interactive(call) => self.interactive(call),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::question::{fixtures, OutputSpec};

    #[test]
    fn test_extract_answer_takes_last_sentinel() {
        let stdout = "debug 1\nleetforge-output: [1]\nnoise\nleetforge-output: [0,1]\nmore noise\n";
        assert_eq!(extract_answer(stdout), Some("[0,1]"));
    }

    #[test]
    fn test_extract_answer_missing() {
        assert_eq!(extract_answer("hello\nworld"), None);
        assert_eq!(extract_answer(""), None);
    }

    #[test]
    fn test_extract_answer_crlf() {
        assert_eq!(extract_answer("leetforge-output: 3\r\n"), Some("3"));
    }

    #[test]
    fn test_sentinel_line() {
        assert_eq!(sentinel_line("[null,null,3]"), "leetforge-output: [null,null,3]");
        assert_eq!(extract_answer(&sentinel_line("x y")), Some("x y"));
    }

    #[test]
    fn test_direct_plan_with_return() {
        let plan = HarnessPlan::from_question(&fixtures::two_sum()).unwrap();
        let HarnessPlan::Direct(call) = &plan else {
            panic!("expected a direct call");
        };
        assert_eq!(call.function, "twoSum");
        assert_eq!(call.params.len(), 2);
        assert_eq!(call.params[1].ty, AbstractType::Integer);
        assert_eq!(plan.answer_type(), Some(&AbstractType::parse("integer[]")));
    }

    #[test]
    fn test_direct_plan_with_output_param() {
        let plan = HarnessPlan::from_question(&fixtures::rotate()).unwrap();
        let HarnessPlan::Direct(call) = &plan else {
            panic!("expected a direct call");
        };
        assert_eq!(call.answer, Answer::Param(0));
        assert_eq!(call.answer_type(), &AbstractType::parse("integer[]"));
    }

    #[test]
    fn test_interactive_plan() {
        let plan = HarnessPlan::from_question(&fixtures::my_class()).unwrap();
        let HarnessPlan::Interactive(call) = &plan else {
            panic!("expected an interactive call");
        };
        assert_eq!(call.class, "MyClass");
        assert_eq!(call.constructor[0].name, "capacity");
        assert_eq!(call.methods[0].ret, AbstractType::Void);
        assert!(call.uses_params());
        assert_eq!(plan.answer_type(), None);
    }

    #[test]
    fn test_plan_rejects_bad_output_index() {
        let mut q = fixtures::rotate();
        q.meta_data.output = Some(OutputSpec { paramindex: 5 });
        assert!(matches!(
            HarnessPlan::from_question(&q),
            Err(LangError::MetadataShape { .. })
        ));
    }
}
