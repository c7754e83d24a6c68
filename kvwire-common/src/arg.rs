//! # Command Arguments
//!
//! Purpose: Give command arguments a closed set of shapes so serialization
//! is total and never depends on runtime type inspection.
//!
//! ## Design Principles
//! 1. **Closed Union**: Integer, float, text, or a verbatim protocol token.
//! 2. **Explicit Rendering**: Each variant has exactly one textual wire form.
//! 3. **Borrow-Friendly**: Rendering borrows text and tokens without copying.

use std::borrow::Cow;
use std::fmt;

/// One argument of a command, after the command name.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// Signed integer, rendered in base 10.
    Int(i64),
    /// Double, rendered with shortest round-trip formatting (`inf`, `-inf`).
    Float(f64),
    /// User-supplied text such as keys, members and values.
    Text(String),
    /// Protocol keyword emitted verbatim (`EX`, `WITHSCORES`, ...).
    Token(&'static str),
}

impl Arg {
    /// Returns the textual wire form of the argument.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Arg::Int(n) => Cow::Owned(n.to_string()),
            Arg::Float(f) => Cow::Owned(f.to_string()),
            Arg::Text(s) => Cow::Borrowed(s.as_str()),
            Arg::Token(t) => Cow::Borrowed(t),
        }
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl From<i64> for Arg {
    fn from(value: i64) -> Self {
        Arg::Int(value)
    }
}

impl From<i32> for Arg {
    fn from(value: i32) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<u32> for Arg {
    fn from(value: u32) -> Self {
        Arg::Int(i64::from(value))
    }
}

impl From<usize> for Arg {
    fn from(value: usize) -> Self {
        // Lengths above i64::MAX cannot occur on supported targets.
        Arg::Int(value as i64)
    }
}

impl From<f64> for Arg {
    fn from(value: f64) -> Self {
        Arg::Float(value)
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Text(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Text(value)
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Arg::Text(value.clone())
    }
}
