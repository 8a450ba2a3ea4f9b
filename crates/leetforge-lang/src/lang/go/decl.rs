//! Scanner for single-line Go `func` declarations

/// A `func` declaration whose opening brace ends the line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl<'a> {
    /// Receiver list without parentheses, e.g. `this *MyClass`
    pub receiver: Option<&'a str>,
    pub name: &'a str,
    /// Parameter list without parentheses
    pub params: &'a str,
    /// Result list as written, trimmed; empty for no results
    pub results: &'a str,
}

impl<'a> FuncDecl<'a> {
    pub fn parse(line: &'a str) -> Option<Self> {
        let rest = line.strip_prefix("func ")?.trim_start();

        let (receiver, rest) = if rest.starts_with('(') {
            let (inner, rest) = paren_group(rest)?;
            (Some(inner.trim()), rest.trim_start())
        } else {
            (None, rest)
        };

        let open = rest.find('(')?;
        let name = rest[..open].trim();
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return None;
        }
        let (params, rest) = paren_group(&rest[open..])?;

        let results = rest.trim_end().strip_suffix('{')?.trim();
        Some(Self {
            receiver,
            name,
            params,
            results,
        })
    }

    /// Type named by the receiver, pointer stripped
    pub fn receiver_type(&self) -> Option<&'a str> {
        let receiver = self.receiver?;
        let ty = receiver.split_whitespace().last()?;
        Some(ty.trim_start_matches('*'))
    }

    /// Single named result as `(name, type)`
    pub fn named_result(&self) -> Option<(&'a str, &'a str)> {
        let inner = self.results.strip_prefix('(')?.strip_suffix(')')?;
        if inner.contains(',') {
            return None;
        }
        let mut words = inner.split_whitespace();
        match (words.next(), words.next(), words.next()) {
            (Some(name), Some(ty), None) => Some((name, ty)),
            _ => None,
        }
    }

    /// Declaration line with `results` in place of the current results
    pub fn render_with_results(&self, results: &str) -> String {
        let mut line = String::from("func ");
        if let Some(receiver) = self.receiver {
            line.push('(');
            line.push_str(receiver);
            line.push_str(") ");
        }
        line.push_str(self.name);
        line.push('(');
        line.push_str(self.params);
        line.push(')');
        if !results.is_empty() {
            line.push(' ');
            line.push_str(results);
        }
        line.push_str(" {");
        line
    }
}

/// Split `(inner) rest` at the matching close paren
fn paren_group(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (idx, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some((&text[1..idx], &text[idx + 1..]));
                }
            }
            _ => {}
        }
    }
    None
}

/// Index of the line closing the function body opened on `start`.
///
/// `None` when the body closes on the declaration line itself or never
/// closes.
pub fn body_end(lines: &[&str], start: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (idx, line) in lines.iter().enumerate().skip(start) {
        for ch in line.chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return (idx != start).then_some(idx);
                    }
                }
                _ => {}
            }
        }
    }
    None
}
