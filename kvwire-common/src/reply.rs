//! # Reply Model
//!
//! Purpose: Represent one decoded transport reply and the typed collections
//! the coercion layer derives from it.
//!
//! ## Design Principles
//! 1. **Closed Variants**: A `Reply` is exactly one variant; coercers match
//!    exhaustively and reject what they do not accept.
//! 2. **Transient Values**: Replies are created per call and consumed once.
//! 3. **Legacy Adapter**: `LegacyResult` carries flat text output from older
//!    transports and is reinterpreted by context.
//!
//! ## Sentinel
//!
//! Inside a flat text sequence the literal token `"NULL"` stands for the nil
//! reply. Only the exact uppercase token is a sentinel; `"null"` is data.

use std::collections::HashMap;
use std::fmt;

/// Token marking an absent element inside a flat text sequence.
pub const NULL_SENTINEL: &str = "NULL";

/// Decoded result of one command execution.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Absent value (null bulk string, null array).
    Nil,
    /// Integer reply.
    Integer(i64),
    /// Double reply.
    Float(f64),
    /// Simple or bulk string reply.
    Text(String),
    /// Bulk string reply whose payload is not valid UTF-8.
    Bytes(Vec<u8>),
    /// Array reply.
    List(Vec<Reply>),
    /// Flat text output from a legacy transport.
    Legacy(LegacyResult),
}

impl Reply {
    /// Returns the variant tag, used in coercion error messages.
    pub fn kind(&self) -> ReplyKind {
        match self {
            Reply::Nil => ReplyKind::Nil,
            Reply::Integer(_) => ReplyKind::Integer,
            Reply::Float(_) => ReplyKind::Float,
            Reply::Text(_) => ReplyKind::Text,
            Reply::Bytes(_) => ReplyKind::Bytes,
            Reply::List(_) => ReplyKind::List,
            Reply::Legacy(_) => ReplyKind::Legacy,
        }
    }

    /// Returns true for the nil reply.
    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, Reply::Nil)
    }
}

impl From<i64> for Reply {
    fn from(value: i64) -> Self {
        Reply::Integer(value)
    }
}

impl From<f64> for Reply {
    fn from(value: f64) -> Self {
        Reply::Float(value)
    }
}

impl From<&str> for Reply {
    fn from(value: &str) -> Self {
        Reply::Text(value.to_string())
    }
}

impl From<String> for Reply {
    fn from(value: String) -> Self {
        Reply::Text(value)
    }
}

impl From<Vec<u8>> for Reply {
    fn from(data: Vec<u8>) -> Self {
        Reply::Bytes(data)
    }
}

impl From<Vec<Reply>> for Reply {
    fn from(items: Vec<Reply>) -> Self {
        Reply::List(items)
    }
}

impl From<LegacyResult> for Reply {
    fn from(result: LegacyResult) -> Self {
        Reply::Legacy(result)
    }
}

/// Variant tag of a `Reply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    Nil,
    Integer,
    Float,
    Text,
    Bytes,
    List,
    Legacy,
}

impl fmt::Display for ReplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplyKind::Nil => "nil",
            ReplyKind::Integer => "integer",
            ReplyKind::Float => "float",
            ReplyKind::Text => "text",
            ReplyKind::Bytes => "bytes",
            ReplyKind::List => "list",
            ReplyKind::Legacy => "legacy result",
        };
        f.write_str(name)
    }
}

/// Flat sequence of text tokens produced by transports without typed replies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyResult {
    pub data: Vec<String>,
}

impl LegacyResult {
    /// Builds a legacy result from any sequence of tokens.
    pub fn new<I, S>(data: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        LegacyResult {
            data: data.into_iter().map(Into::into).collect(),
        }
    }
}

/// Member of a sorted set together with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMember {
    pub member: String,
    pub score: f64,
}

impl ScoreMember {
    pub fn new(member: impl Into<String>, score: f64) -> Self {
        ScoreMember {
            member: member.into(),
            score,
        }
    }
}

/// String-keyed string map that remembers first-insertion order.
///
/// Inserting an existing key overwrites its value in place; the key keeps
/// its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl TextMap {
    pub fn new() -> Self {
        TextMap::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        TextMap {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Inserts a pair, returning the previous value for `key` if any.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        if let Some(&slot) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[slot].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&slot| self.entries[slot].1.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn into_vec(self) -> Vec<(String, String)> {
        self.entries
    }
}

impl IntoIterator for TextMap {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TextMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = TextMap::new();
        for (k, v) in iter {
            map.insert(k.into(), v.into());
        }
        map
    }
}
