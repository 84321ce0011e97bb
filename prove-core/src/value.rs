use std::cmp::Ordering;
use std::fmt;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::error::EvalError;

/// A compiled regular expression used as the right side of `=~`.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Pattern)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        self.0.is_match(haystack)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~r/{}/", self.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The evaluated form of an operand.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Atom(String),
    String(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Pattern(Pattern),
}

impl Value {
    pub fn atom(name: impl Into<String>) -> Self {
        Value::Atom(name.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Atom(_) => "atom",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Pattern(_) => "pattern",
        }
    }

    /// Equality where `Int` and `Float` compare by numeric value.
    pub fn loose_eq(&self, other: &Value) -> bool {
        self.eq_with(other, false)
    }

    /// Equality that additionally requires both sides to be the same variant.
    pub fn strict_eq(&self, other: &Value) -> bool {
        self.eq_with(other, true)
    }

    fn eq_with(&self, other: &Value, strict: bool) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                !strict && int_float_cmp(*a, *b) == Some(Ordering::Equal)
            }
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.eq_with(y, strict))
            }
            _ => self == other,
        }
    }

    /// Total term order across kinds: numbers < atoms < tuples < lists <
    /// strings < patterns. `nil`, `true` and `false` order as atoms by name.
    /// Returns `None` only when a `NaN` is involved.
    pub fn term_cmp(&self, other: &Value) -> Option<Ordering> {
        let rank = self.rank().cmp(&other.rank());
        if rank != Ordering::Equal {
            return Some(rank);
        }

        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Tuple(a), Value::Tuple(b)) => match a.len().cmp(&b.len()) {
                Ordering::Equal => compare_elements(a, b),
                unequal => Some(unequal),
            },
            (Value::List(a), Value::List(b)) => compare_elements(a, b),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Pattern(a), Value::Pattern(b)) => Some(a.as_str().cmp(b.as_str())),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => int_float_cmp(*a, *b),
            (Value::Float(a), Value::Int(b)) => int_float_cmp(*b, *a).map(Ordering::reverse),
            _ => Some(self.atom_name().cmp(other.atom_name())),
        }
    }

    /// `=~`: substring test for a string right side, regex search for a
    /// pattern.
    pub fn matches(&self, pattern: &Value) -> Result<bool, EvalError> {
        match (self, pattern) {
            (Value::String(haystack), Value::String(needle)) => Ok(haystack.contains(needle.as_str())),
            (Value::String(haystack), Value::Pattern(pattern)) => Ok(pattern.is_match(haystack)),
            _ => Err(EvalError::NotMatchable {
                left: self.clone(),
                right: pattern.clone(),
            }),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Int(_) | Value::Float(_) => 0,
            Value::Nil | Value::Bool(_) | Value::Atom(_) => 1,
            Value::Tuple(_) => 2,
            Value::List(_) => 3,
            Value::String(_) => 4,
            Value::Pattern(_) => 5,
        }
    }

    fn atom_name(&self) -> &str {
        match self {
            Value::Nil => "nil",
            Value::Bool(true) => "true",
            Value::Bool(false) => "false",
            Value::Atom(name) => name,
            _ => "",
        }
    }
}

/// Orders an integer against a float without rounding the integer.
fn int_float_cmp(int: i64, float: f64) -> Option<Ordering> {
    // 2^63; every finite float below it and at or above -2^63 truncates to
    // an exact i64.
    const BOUND: f64 = 9_223_372_036_854_775_808.0;
    if float.is_nan() {
        return None;
    }
    if float >= BOUND {
        return Some(Ordering::Less);
    }
    if float < -BOUND {
        return Some(Ordering::Greater);
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal => 0.0_f64.partial_cmp(&(float - whole)),
        unequal => Some(unequal),
    }
}

fn compare_elements(a: &[Value], b: &[Value]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b) {
        match x.term_cmp(y)? {
            Ordering::Equal => continue,
            unequal => return Some(unequal),
        }
    }
    Some(a.len().cmp(&b.len()))
}

fn write_sequence(f: &mut fmt::Formatter<'_>, values: &[Value]) -> fmt::Result {
    for (index, value) in values.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{value}")?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value:?}"),
            Value::Atom(name) => write!(f, ":{name}"),
            Value::String(value) => write!(f, "{value:?}"),
            Value::List(values) => {
                write!(f, "[")?;
                write_sequence(f, values)?;
                write!(f, "]")
            }
            Value::Tuple(values) => {
                write!(f, "{{")?;
                write_sequence(f, values)?;
                write!(f, "}}")
            }
            Value::Pattern(pattern) => write!(f, "{pattern}"),
        }
    }
}

macro_rules! int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(i64::from(value))
                }
            }
        )*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

macro_rules! wide_int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    i64::try_from(value)
                        .map(Value::Int)
                        .unwrap_or(Value::Float(value as f64))
                }
            }
        )*
    };
}

wide_int_from!(u64, usize, isize, i128, u128);

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::String(value.to_string())
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::String(value.clone())
    }
}

impl From<&Value> for Value {
    fn from(value: &Value) -> Self {
        value.clone()
    }
}

impl From<Regex> for Value {
    fn from(value: Regex) -> Self {
        Value::Pattern(Pattern(value))
    }
}

impl From<Pattern> for Value {
    fn from(value: Pattern) -> Self {
        Value::Pattern(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Nil)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(values: Vec<T>) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value> + Clone> From<&[T]> for Value {
    fn from(values: &[T]) -> Self {
        Value::List(values.iter().cloned().map(Into::into).collect())
    }
}

impl<T: Into<Value>, const N: usize> From<[T; N]> for Value {
    fn from(values: [T; N]) -> Self {
        Value::List(values.into_iter().map(Into::into).collect())
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::Tuple(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::Tuple(vec![a.into(), b.into(), c.into()])
    }
}
