//! # Reply Coercion
//!
//! Purpose: Normalize a transport reply into the typed result a command
//! expects, with fixed fallback and error rules.
//!
//! ## Design Principles
//! 1. **Stateless**: Every coercer is a pure function of its input.
//! 2. **Error Passthrough**: A transport error is returned unchanged and the
//!    reply is never inspected.
//! 3. **Absence Is Not Failure**: Nil coerces to the zero scalar, or to an
//!    absent collection (`None`), never to an error.
//! 4. **All Or Nothing**: Collection coercers stop at the first element that
//!    fails and return no partial result.
//!
//! ## Rules
//!
//! | reply        | integer          | float            | text            | bytes           | list            |
//! |--------------|------------------|------------------|-----------------|-----------------|-----------------|
//! | `Nil`        | `0`              | `0.0`            | `""`            | empty           | `None`          |
//! | `Integer(n)` | `n`              | `n as f64`       | unexpected type | unexpected type | unexpected type |
//! | `Float(f)`   | truncated        | `f`              | unexpected type | unexpected type | unexpected type |
//! | `Text(s)`    | parsed           | parsed           | `s`             | UTF-8 of `s`    | unexpected type |
//! | `Bytes(b)`   | format error     | format error     | lossy `b`       | `b`             | unexpected type |
//! | `List(xs)`   | unexpected type  | unexpected type  | unexpected type | unexpected type | `Some(xs)`      |
//! | `Legacy(r)`  | first token      | first token      | first token     | first token     | flat text list  |
//!
//! Text does not stringify numbers: a numeric reply for a text target is a
//! pairing error and is reported as one. Binary payloads only survive
//! intact through the bytes target.

use crate::error::{TransportError, WireError, WireResult};
use crate::reply::{LegacyResult, Reply, ScoreMember, TextMap, NULL_SENTINEL};

const INTEGER: &str = "i64";
const FLOAT: &str = "f64";
const TEXT: &str = "string";
const BYTES: &str = "bytes";
const LIST: &str = "list";
const TEXT_MAP: &str = "string map";
const SCORE_MEMBERS: &str = "score/member list";

/// Decodes a reply into a concrete result type.
///
/// Command builders are parameterized by their output type, so the pairing
/// of a command with its coercer is fixed at compile time.
pub trait FromReply: Sized {
    fn from_reply(reply: Reply) -> WireResult<Self>;
}

/// Coerces a transport outcome into any `FromReply` type.
pub fn coerce<T: FromReply>(reply: Result<Reply, TransportError>) -> WireResult<T> {
    T::from_reply(reply?)
}

/// Coerces to a signed 64-bit integer.
pub fn to_integer(reply: Result<Reply, TransportError>) -> WireResult<i64> {
    integer(reply?)
}

/// Coerces to a 64-bit float.
pub fn to_float(reply: Result<Reply, TransportError>) -> WireResult<f64> {
    float(reply?)
}

/// Coerces to text. Numeric replies are rejected.
pub fn to_text(reply: Result<Reply, TransportError>) -> WireResult<String> {
    text(reply?)
}

/// Coerces to raw bytes, keeping binary payloads intact.
pub fn to_bytes(reply: Result<Reply, TransportError>) -> WireResult<Vec<u8>> {
    bytes(reply?)
}

/// Coerces to a heterogeneous list; `None` when the reply is absent.
pub fn to_list(reply: Result<Reply, TransportError>) -> WireResult<Option<Vec<Reply>>> {
    list(reply?)
}

/// Coerces every element to an integer; empty or absent yields `None`.
pub fn to_integer_list(reply: Result<Reply, TransportError>) -> WireResult<Option<Vec<i64>>> {
    elements(reply?, integer)
}

/// Coerces every element to a float; empty or absent yields `None`.
pub fn to_float_list(reply: Result<Reply, TransportError>) -> WireResult<Option<Vec<f64>>> {
    elements(reply?, float)
}

/// Coerces every element to text; empty or absent yields `None`.
pub fn to_text_list(reply: Result<Reply, TransportError>) -> WireResult<Option<Vec<String>>> {
    elements(reply?, text)
}

/// Folds `[k1, v1, k2, v2, ...]` into a map. Later duplicates win.
pub fn to_text_map(reply: Result<Reply, TransportError>) -> WireResult<Option<TextMap>> {
    text_map(reply?)
}

/// Folds `[m1, s1, m2, s2, ...]` into score/member pairs in reply order.
pub fn to_score_members(
    reply: Result<Reply, TransportError>,
) -> WireResult<Option<Vec<ScoreMember>>> {
    score_members(reply?)
}

fn integer(reply: Reply) -> WireResult<i64> {
    match reply {
        Reply::Nil => Ok(0),
        Reply::Integer(n) => Ok(n),
        // `as` truncates toward zero and saturates out-of-range values.
        Reply::Float(f) => Ok(f as i64),
        Reply::Text(s) => s.parse::<i64>().map_err(|_| format_error(INTEGER, s)),
        Reply::Bytes(data) => Err(format_error(INTEGER, lossy(&data))),
        Reply::Legacy(result) => integer(Reply::Text(first_token(result, INTEGER)?)),
        other => Err(unexpected(&other, INTEGER)),
    }
}

fn float(reply: Reply) -> WireResult<f64> {
    match reply {
        Reply::Nil => Ok(0.0),
        Reply::Float(f) => Ok(f),
        Reply::Integer(n) => Ok(n as f64),
        Reply::Text(s) => s.parse::<f64>().map_err(|_| format_error(FLOAT, s)),
        Reply::Bytes(data) => Err(format_error(FLOAT, lossy(&data))),
        Reply::Legacy(result) => float(Reply::Text(first_token(result, FLOAT)?)),
        other => Err(unexpected(&other, FLOAT)),
    }
}

fn text(reply: Reply) -> WireResult<String> {
    match reply {
        Reply::Nil => Ok(String::new()),
        Reply::Text(s) => Ok(s),
        Reply::Bytes(data) => Ok(lossy(&data)),
        Reply::Legacy(result) => first_token(result, TEXT),
        other => Err(unexpected(&other, TEXT)),
    }
}

fn bytes(reply: Reply) -> WireResult<Vec<u8>> {
    match reply {
        Reply::Nil => Ok(Vec::new()),
        Reply::Text(s) => Ok(s.into_bytes()),
        Reply::Bytes(data) => Ok(data),
        Reply::Legacy(result) => first_token(result, BYTES).map(String::into_bytes),
        other => Err(unexpected(&other, BYTES)),
    }
}

fn list(reply: Reply) -> WireResult<Option<Vec<Reply>>> {
    match reply {
        Reply::Nil => Ok(None),
        Reply::List(items) => Ok(Some(items)),
        Reply::Legacy(result) => Ok(flat_text(result.data)),
        other => Err(unexpected(&other, LIST)),
    }
}

/// Reinterprets flat text tokens as list elements, honoring the sentinel.
fn flat_text(tokens: Vec<String>) -> Option<Vec<Reply>> {
    if tokens.is_empty() {
        return None;
    }
    let items = tokens
        .into_iter()
        .map(|token| {
            if token == NULL_SENTINEL {
                Reply::Nil
            } else {
                Reply::Text(token)
            }
        })
        .collect();
    Some(items)
}

fn elements<T>(reply: Reply, each: fn(Reply) -> WireResult<T>) -> WireResult<Option<Vec<T>>> {
    let items = match list(reply)? {
        Some(items) if !items.is_empty() => items,
        _ => return Ok(None),
    };
    items.into_iter().map(each).collect::<WireResult<Vec<T>>>().map(Some)
}

fn text_map(reply: Reply) -> WireResult<Option<TextMap>> {
    let tokens = match paired_tokens(reply, TEXT_MAP)? {
        Some(tokens) => tokens,
        None => return Ok(None),
    };
    let mut map = TextMap::with_capacity(tokens.len() / 2);
    let mut tokens = tokens.into_iter();
    while let (Some(key), Some(value)) = (tokens.next(), tokens.next()) {
        map.insert(key, value);
    }
    Ok(Some(map))
}

fn score_members(reply: Reply) -> WireResult<Option<Vec<ScoreMember>>> {
    let tokens = match paired_tokens(reply, SCORE_MEMBERS)? {
        Some(tokens) => tokens,
        None => return Ok(None),
    };
    let mut pairs = Vec::with_capacity(tokens.len() / 2);
    let mut tokens = tokens.into_iter();
    while let (Some(member), Some(score)) = (tokens.next(), tokens.next()) {
        let score = float(Reply::Text(score))?;
        pairs.push(ScoreMember { member, score });
    }
    Ok(Some(pairs))
}

fn paired_tokens(reply: Reply, target: &'static str) -> WireResult<Option<Vec<String>>> {
    let tokens = match elements(reply, text)? {
        Some(tokens) => tokens,
        None => return Ok(None),
    };
    if tokens.len() % 2 != 0 {
        return Err(WireError::MalformedReply {
            target,
            len: tokens.len(),
        });
    }
    Ok(Some(tokens))
}

fn first_token(result: LegacyResult, target: &'static str) -> WireResult<String> {
    result
        .data
        .into_iter()
        .next()
        .ok_or(WireError::EmptyReply { target })
}

fn unexpected(reply: &Reply, target: &'static str) -> WireError {
    WireError::UnexpectedType {
        actual: reply.kind(),
        target,
    }
}

fn lossy(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

fn format_error(target: &'static str, text: String) -> WireError {
    WireError::Format { target, text }
}

impl FromReply for Reply {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        Ok(reply)
    }
}

impl FromReply for i64 {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        integer(reply)
    }
}

impl FromReply for f64 {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        float(reply)
    }
}

impl FromReply for String {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        text(reply)
    }
}

impl FromReply for Vec<u8> {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        bytes(reply)
    }
}

impl FromReply for Option<Vec<Reply>> {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        list(reply)
    }
}

impl FromReply for Option<Vec<i64>> {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        elements(reply, integer)
    }
}

impl FromReply for Option<Vec<f64>> {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        elements(reply, float)
    }
}

impl FromReply for Option<Vec<String>> {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        elements(reply, text)
    }
}

impl FromReply for Option<TextMap> {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        text_map(reply)
    }
}

impl FromReply for Option<Vec<ScoreMember>> {
    fn from_reply(reply: Reply) -> WireResult<Self> {
        score_members(reply)
    }
}
