use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::error::EvalError;
use crate::value::Value;

/// The closed set of binary operators a prove declaration may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "===")]
    StrictEq,
    #[serde(rename = "!==")]
    StrictNe,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "=~")]
    Match,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Eq,
        Operator::Ne,
        Operator::StrictEq,
        Operator::StrictNe,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::Match,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::StrictEq => "===",
            Operator::StrictNe => "!==",
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Match => "=~",
        }
    }

    /// Looks up an operator by its token. Whitespace inside the token is
    /// ignored, so `"== ="` (how `===` stringifies from Rust tokens) is
    /// accepted as `===`.
    pub fn from_token(token: &str) -> Option<Operator> {
        let compact: String = token.chars().filter(|ch| !ch.is_whitespace()).collect();
        Operator::ALL
            .into_iter()
            .find(|operator| operator.token() == compact)
    }

    /// Applies the operator to two evaluated operands.
    ///
    /// Only `=~` can fail: its left side must be a string and its right side a
    /// string or a pattern. Every other operator is total.
    pub fn holds(self, left: &Value, right: &Value) -> Result<bool, EvalError> {
        let holds = match self {
            Operator::Eq => left.loose_eq(right),
            Operator::Ne => !left.loose_eq(right),
            Operator::StrictEq => left.strict_eq(right),
            Operator::StrictNe => !left.strict_eq(right),
            Operator::Lt => left.term_cmp(right) == Some(Ordering::Less),
            Operator::Le => matches!(
                left.term_cmp(right),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Operator::Gt => left.term_cmp(right) == Some(Ordering::Greater),
            Operator::Ge => matches!(
                left.term_cmp(right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Operator::Match => return left.matches(right),
        };
        Ok(holds)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Finds the operators that sit at the top level of a rendered expression.
///
/// Bracket groups, string and char literals, `->`/`=>` arrows, shifts and
/// turbofish generics (`::<...>`) are skipped. Returns byte offsets paired
/// with the operator found there, in source order.
pub fn scan_operators(rendered: &str) -> Vec<(usize, Operator)> {
    let bytes = rendered.as_bytes();
    let mut found = Vec::new();
    let mut depth = 0usize;
    let mut generics = 0usize;
    let mut index = 0;

    while index < bytes.len() {
        let Some(rest) = rendered.get(index..) else {
            index += 1;
            continue;
        };
        if let Some(end) = skip_raw_string(bytes, index) {
            index = end;
            continue;
        }
        let byte = bytes[index];
        match byte {
            b'"' => {
                index = skip_string(bytes, index + 1);
                continue;
            }
            b'\'' => {
                index = skip_char_or_lifetime(bytes, index);
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }

        if depth > 0 {
            index += 1;
            continue;
        }

        if rest.starts_with("::<") {
            generics += 1;
            index += 3;
            continue;
        }
        if generics > 0 {
            match byte {
                b'<' => generics += 1,
                b'>' => generics -= 1,
                _ => {}
            }
            index += 1;
            continue;
        }

        if let Some(skip) = ["<<=", ">>=", "<<", ">>", "->", "=>"]
            .iter()
            .find(|token| rest.starts_with(**token))
        {
            index += skip.len();
            continue;
        }

        let operator = ["===", "!==", "==", "!=", "<=", ">=", "=~", "<", ">"]
            .iter()
            .find(|token| rest.starts_with(**token))
            .and_then(|token| Operator::from_token(token).map(|operator| (*token, operator)));
        match operator {
            Some((token, operator)) => {
                found.push((index, operator));
                index += token.len();
            }
            None => index += rest.chars().next().map(char::len_utf8).unwrap_or(1),
        }
    }

    found
}

fn skip_string(bytes: &[u8], mut index: usize) -> usize {
    while index < bytes.len() {
        match bytes[index] {
            b'\\' => index += 2,
            b'"' => return index + 1,
            _ => index += 1,
        }
    }
    index
}

/// If a raw string literal (`r"..."`, `r#"..."#`, `br"..."`) starts at
/// `start`, returns the offset just past it. Raw strings have no escapes, so
/// only the closing quote and its matching `#`s end them.
fn skip_raw_string(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes.get(start) != Some(&b'r') {
        return None;
    }
    let is_ident = |byte: u8| byte.is_ascii_alphanumeric() || byte == b'_';
    if let Some(&previous) = start.checked_sub(1).and_then(|at| bytes.get(at)) {
        let byte_prefix = previous == b'b'
            && start
                .checked_sub(2)
                .and_then(|at| bytes.get(at))
                .map_or(true, |&before| !is_ident(before));
        if is_ident(previous) && !byte_prefix {
            return None;
        }
    }

    let mut index = start + 1;
    let mut hashes = 0;
    while bytes.get(index) == Some(&b'#') {
        hashes += 1;
        index += 1;
    }
    if bytes.get(index) != Some(&b'"') {
        return None;
    }
    index += 1;

    while index < bytes.len() {
        if bytes[index] == b'"' {
            let closing = bytes[index + 1..]
                .iter()
                .take(hashes)
                .take_while(|&&byte| byte == b'#')
                .count();
            if closing == hashes {
                return Some(index + 1 + hashes);
            }
        }
        index += 1;
    }
    Some(index)
}

fn skip_char_or_lifetime(bytes: &[u8], start: usize) -> usize {
    // 'x', '\n', '\'' are char literals; anything else is a lifetime.
    match (bytes.get(start + 1), bytes.get(start + 2)) {
        (Some(b'\\'), _) => {
            let mut index = start + 2;
            while index < bytes.len() {
                if bytes[index] == b'\'' && index > start + 2 {
                    return index + 1;
                }
                index += 1;
            }
            index
        }
        (Some(_), _) => {
            let mut index = start + 1;
            let limit = (start + 6).min(bytes.len());
            while index < limit {
                if bytes[index] == b'\'' && index > start + 1 {
                    return index + 1;
                }
                index += 1;
            }
            start + 1
        }
        (None, _) => start + 1,
    }
}
