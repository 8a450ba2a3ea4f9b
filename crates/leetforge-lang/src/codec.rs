//! Language-neutral values in the LeetCode wire format
//!
//! Question metadata names value kinds abstractly (`integer`, `string[]`,
//! `TreeNode`, ...). Test inputs and answers travel between the runner and
//! the generated drivers as text: JSON-like scalars and arrays, binary trees
//! in level order with `null` holes, linked lists as arrays.

use std::{collections::VecDeque, fmt};

use crate::error::{LangError, Result};

/// Value kind named in question metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbstractType {
    Integer,
    Long,
    Double,
    Boolean,
    Character,
    String,
    Void,
    TreeNode,
    ListNode,
    /// `X[]` or `list<X>`
    Array(Box<AbstractType>),
    /// Toolchain-native name passed through untouched
    Other(String),
}

impl AbstractType {
    /// Parse a metadata type name
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if let Some(inner) = name.strip_suffix("[]") {
            return AbstractType::Array(Box::new(Self::parse(inner)));
        }
        if let Some(inner) = name.strip_prefix("list<").and_then(|s| s.strip_suffix('>')) {
            return AbstractType::Array(Box::new(Self::parse(inner)));
        }
        match name {
            "integer" => AbstractType::Integer,
            "long" => AbstractType::Long,
            "double" => AbstractType::Double,
            "boolean" => AbstractType::Boolean,
            "character" => AbstractType::Character,
            "string" => AbstractType::String,
            "void" | "" => AbstractType::Void,
            "TreeNode" => AbstractType::TreeNode,
            "ListNode" => AbstractType::ListNode,
            other => AbstractType::Other(other.to_string()),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, AbstractType::Void)
    }
}

impl fmt::Display for AbstractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbstractType::Integer => write!(f, "integer"),
            AbstractType::Long => write!(f, "long"),
            AbstractType::Double => write!(f, "double"),
            AbstractType::Boolean => write!(f, "boolean"),
            AbstractType::Character => write!(f, "character"),
            AbstractType::String => write!(f, "string"),
            AbstractType::Void => write!(f, "void"),
            AbstractType::TreeNode => write!(f, "TreeNode"),
            AbstractType::ListNode => write!(f, "ListNode"),
            AbstractType::Array(inner) => write!(f, "{}[]", inner),
            AbstractType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A decoded value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    /// 32-bit `integer`
    Int(i64),
    Long(i64),
    Double(f64),
    Bool(bool),
    Char(char),
    Str(String),
    Array(Vec<Value>),
    /// Binary tree as level-order slots, trailing holes trimmed
    Tree(Vec<Option<i64>>),
    /// Linked list values in order
    List(Vec<i64>),
}

/// Tolerance used when comparing doubles
pub const DOUBLE_EPSILON: f64 = 1e-5;

impl Value {
    /// Structural equality with doubles compared within [`DOUBLE_EPSILON`]
    pub fn approx_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Double(a), Value::Double(b)) => (a - b).abs() <= DOUBLE_EPSILON,
            (Value::Array(a), Value::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.approx_eq(y))
            }
            _ => self == other,
        }
    }
}

/// Encode a value in the wire format
pub fn serialize(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Int(v) | Value::Long(v) => v.to_string(),
        Value::Double(v) => format!("{:.5}", v),
        Value::Bool(v) => v.to_string(),
        Value::Char(c) => json_string(&c.to_string()),
        Value::Str(s) => json_string(s),
        Value::Array(items) => join_array(items.iter().map(serialize)),
        Value::Tree(slots) => join_array(slots.iter().map(|slot| match slot {
            Some(val) => val.to_string(),
            None => "null".to_string(),
        })),
        Value::List(values) => join_array(values.iter().map(i64::to_string)),
    }
}

/// Decode wire-format text as the given type
pub fn deserialize(text: &str, ty: &AbstractType) -> Result<Value> {
    let s = text.trim();
    match ty {
        AbstractType::Integer => {
            let v = parse_int(s, ty)?;
            if i32::try_from(v).is_err() {
                return Err(LangError::codec(s, ty, "out of 32-bit range"));
            }
            Ok(Value::Int(v))
        }
        AbstractType::Long => Ok(Value::Long(parse_int(s, ty)?)),
        AbstractType::Double => s
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|e| LangError::codec(s, ty, e.to_string())),
        AbstractType::Boolean => match s {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err(LangError::codec(s, ty, "expected true or false")),
        },
        AbstractType::Character => {
            let decoded = parse_json_string(s, ty)?;
            let mut chars = decoded.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Char(c)),
                _ => Err(LangError::codec(s, ty, "expected exactly one character")),
            }
        }
        AbstractType::String => Ok(Value::Str(parse_json_string(s, ty)?)),
        AbstractType::Void => match s {
            "" | "null" => Ok(Value::Null),
            _ => Err(LangError::codec(s, ty, "expected null")),
        },
        AbstractType::Array(inner) => split_array(s)?
            .iter()
            .map(|item| deserialize(item, inner))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        AbstractType::TreeNode => {
            let slots = split_array(s)?
                .iter()
                .map(|item| match item.as_str() {
                    "null" => Ok(None),
                    other => parse_int(other, ty).map(Some),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Tree(canonical_tree(&slots)))
        }
        AbstractType::ListNode => {
            let values = split_array(s)?
                .iter()
                .map(|item| parse_int(item, ty))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::List(values))
        }
        AbstractType::Other(_) => Err(LangError::codec(s, ty, "no decoder for this type")),
    }
}

/// Split the top level of an array literal without decoding its elements.
///
/// `[1,[2,3],"a,b"]` yields `1`, `[2,3]` and `"a,b"`.
pub fn split_array(text: &str) -> Result<Vec<String>> {
    let s = text.trim();
    let inner = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| LangError::codec(s, "array", "expected [...]"))?;
    if inner.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start = 0;

    for (idx, ch) in inner.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| LangError::codec(s, "array", "unbalanced brackets"))?;
            }
            ',' if depth == 0 => {
                items.push(inner[start..idx].trim().to_string());
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || in_string {
        return Err(LangError::codec(s, "array", "unterminated element"));
    }
    items.push(inner[start..].trim().to_string());
    Ok(items)
}

/// Join already-serialized elements into an array literal
pub fn join_array<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::from("[");
    for (idx, item) in items.into_iter().enumerate() {
        if idx > 0 {
            out.push(',');
        }
        out.push_str(item.as_ref());
    }
    out.push(']');
    out
}

fn json_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

fn parse_int(s: &str, ty: &AbstractType) -> Result<i64> {
    s.parse::<i64>()
        .map_err(|e| LangError::codec(s, ty, e.to_string()))
}

fn parse_json_string(s: &str, ty: &AbstractType) -> Result<String> {
    serde_json::from_str::<String>(s).map_err(|e| LangError::codec(s, ty, e.to_string()))
}

/// Normalize level-order slots.
///
/// Slots that no node claims as a child are dropped, as are trailing holes.
/// The walk is iterative so degenerate trees of any depth are fine.
fn canonical_tree(slots: &[Option<i64>]) -> Vec<Option<i64>> {
    if slots.first().copied().flatten().is_none() {
        return Vec::new();
    }

    let n = slots.len();
    let mut children: Vec<[Option<usize>; 2]> = vec![[None, None]; n];
    let mut queue = VecDeque::from([0usize]);
    let mut next = 1;

    while let Some(parent) = queue.pop_front() {
        for side in 0..2 {
            if next >= n {
                break;
            }
            if slots[next].is_some() {
                children[parent][side] = Some(next);
                queue.push_back(next);
            }
            next += 1;
        }
        if next >= n {
            break;
        }
    }

    let mut out = Vec::with_capacity(n);
    let mut queue = VecDeque::from([Some(0usize)]);
    while let Some(slot) = queue.pop_front() {
        match slot {
            Some(idx) => {
                out.push(slots[idx]);
                queue.extend(children[idx]);
            }
            None => out.push(None),
        }
    }
    while out.last().is_some_and(Option::is_none) {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_abstract_types() {
        assert_eq!(AbstractType::parse("integer"), AbstractType::Integer);
        assert_eq!(
            AbstractType::parse("integer[][]"),
            AbstractType::Array(Box::new(AbstractType::Array(Box::new(
                AbstractType::Integer
            ))))
        );
        assert_eq!(
            AbstractType::parse("list<string>"),
            AbstractType::Array(Box::new(AbstractType::String))
        );
        assert_eq!(
            AbstractType::parse("Node"),
            AbstractType::Other("Node".to_string())
        );
        assert_eq!(AbstractType::parse("list<list<integer>>").to_string(), "integer[][]");
    }

    #[test]
    fn test_tree_level_order() {
        let tree = deserialize("[1,null,2,3]", &AbstractType::TreeNode).unwrap();
        assert_eq!(tree, Value::Tree(vec![Some(1), None, Some(2), Some(3)]));
        assert_eq!(serialize(&tree), "[1,null,2,3]");
    }

    #[test]
    fn test_tree_trailing_nulls_are_trimmed() {
        let tree = deserialize("[1,2,null,null,null]", &AbstractType::TreeNode).unwrap();
        assert_eq!(serialize(&tree), "[1,2]");
    }

    #[test]
    fn test_empty_tree_and_list() {
        assert_eq!(
            deserialize("[]", &AbstractType::TreeNode).unwrap(),
            Value::Tree(Vec::new())
        );
        assert_eq!(
            deserialize("[]", &AbstractType::ListNode).unwrap(),
            Value::List(Vec::new())
        );
        assert_eq!(serialize(&Value::Tree(Vec::new())), "[]");
        assert_eq!(serialize(&Value::List(Vec::new())), "[]");
        assert_eq!(
            deserialize("[null,1]", &AbstractType::TreeNode).unwrap(),
            Value::Tree(Vec::new())
        );
    }

    #[test]
    fn test_orphan_slots_are_dropped() {
        // 4 would hang below the missing left child of 1
        let tree = deserialize("[1,null,2,null,null,4]", &AbstractType::TreeNode).unwrap();
        assert_eq!(serialize(&tree), "[1,null,2]");
    }

    #[test]
    fn test_degenerate_tree_depth() {
        let depth = 100_000;
        let mut slots = vec!["0".to_string()];
        for val in 1..depth {
            slots.push("null".to_string());
            slots.push(val.to_string());
        }
        let text = join_array(&slots);

        let tree = deserialize(&text, &AbstractType::TreeNode).unwrap();
        let Value::Tree(ref decoded) = tree else {
            panic!("expected a tree");
        };
        assert_eq!(decoded.iter().flatten().count(), depth);
        assert_eq!(serialize(&tree), text);
        assert_eq!(tree.clone(), tree);
    }

    #[test]
    fn test_list_round_trip() {
        let list = deserialize(" [1, 2, 3] ", &AbstractType::ListNode).unwrap();
        assert_eq!(serialize(&list), "[1,2,3]");
    }

    #[test]
    fn test_strings_and_chars() {
        let ty = AbstractType::parse("string[]");
        let value = deserialize(r#"["a,b","c\"d"]"#, &ty).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Str("a,b".to_string()),
                Value::Str("c\"d".to_string())
            ])
        );
        assert_eq!(serialize(&value), r#"["a,b","c\"d"]"#);

        assert_eq!(
            deserialize(r#""x""#, &AbstractType::Character).unwrap(),
            Value::Char('x')
        );
        assert!(deserialize(r#""xy""#, &AbstractType::Character).is_err());
    }

    #[test]
    fn test_integer_range() {
        assert!(deserialize("2147483648", &AbstractType::Integer).is_err());
        assert_eq!(
            deserialize("2147483648", &AbstractType::Long).unwrap(),
            Value::Long(2147483648)
        );
    }

    #[test]
    fn test_double_format_and_tolerance() {
        assert_eq!(serialize(&Value::Double(2.5)), "2.50000");
        let a = deserialize("2.00000", &AbstractType::Double).unwrap();
        let b = deserialize("2.000001", &AbstractType::Double).unwrap();
        assert!(a.approx_eq(&b));
        assert!(!a.approx_eq(&Value::Double(2.1)));
    }

    #[test]
    fn test_split_array_nested() {
        let items = split_array(r#"[[1,2],[],"]",{"k":[1]}]"#).unwrap();
        assert_eq!(items, vec!["[1,2]", "[]", r#""]""#, r#"{"k":[1]}"#]);
        assert!(split_array("[]").unwrap().is_empty());
        assert!(split_array("1,2").is_err());
        assert!(split_array("[[1,2]").is_err());
    }

    #[test]
    fn test_join_array() {
        assert_eq!(join_array(["null", "null", "3"]), "[null,null,3]");
        assert_eq!(join_array(Vec::<String>::new()), "[]");
    }

    #[test]
    fn test_other_type_has_no_decoder() {
        assert!(matches!(
            deserialize("1", &AbstractType::Other("Node".into())),
            Err(LangError::Codec { .. })
        ));
    }
}
