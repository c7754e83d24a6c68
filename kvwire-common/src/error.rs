//! # Error Taxonomy
//!
//! Purpose: Name every way a single command can fail, from the transport
//! up through reply coercion.
//!
//! ## Design Principles
//! 1. **Opaque Transport Failures**: `TransportError` is carried verbatim and
//!    never interpreted or retried.
//! 2. **Typed Coercion Failures**: Each coercion failure names the requested
//!    target type so callers can tell a wrong pairing from bad data.
//! 3. **Fail Per Call**: Every error is fatal to the call that produced it
//!    and to nothing else.

use thiserror::Error;

use crate::reply::ReplyKind;

/// Result type for command execution and reply coercion.
pub type WireResult<T> = Result<T, WireError>;

/// Failures reported by a transport implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network or IO failure while reading/writing.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Wire framing or parse error.
    #[error("protocol error")]
    Protocol,
    /// Server returned an error reply.
    #[error("server error: {message}")]
    Server { message: String },
    /// Pool is at capacity and no idle connections are available.
    #[error("connection pool exhausted")]
    PoolExhausted,
    /// Address could not be parsed into a socket address.
    #[error("invalid address")]
    InvalidAddress,
    /// The caller's cancellation token fired before the command completed.
    #[error("command cancelled")]
    Cancelled,
    /// The caller's deadline passed before the command completed.
    #[error("deadline exceeded")]
    DeadlineExceeded,
    /// Failure from a third-party transport.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Errors surfaced by command terminals and coercion functions.
#[derive(Debug, Error)]
pub enum WireError {
    /// The transport failed; propagated unchanged.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The reply variant is not accepted by the requested coercion.
    #[error("unexpected reply type ({actual}) for {target}")]
    UnexpectedType {
        actual: ReplyKind,
        target: &'static str,
    },
    /// A text reply could not be parsed as the requested numeric type.
    #[error("cannot parse {text:?} as {target}")]
    Format { target: &'static str, text: String },
    /// A legacy flat-text reply carried no elements.
    #[error("empty legacy reply for {target}")]
    EmptyReply { target: &'static str },
    /// A paired-element reply had an odd number of elements.
    #[error("unexpected reply length {len} for {target}")]
    MalformedReply { target: &'static str, len: usize },
}

impl WireError {
    /// Returns the transport failure, if this error came from the transport.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            WireError::Transport(err) => Some(err),
            _ => None,
        }
    }
}
