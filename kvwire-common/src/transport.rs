//! # Transport Contract
//!
//! Purpose: Define the single seam between command builders and whatever
//! actually moves bytes to the server.
//!
//! ## Design Principles
//! 1. **Strategy Pattern**: Builders depend on `dyn Transport`, never on a
//!    concrete connection type.
//! 2. **One Call Per Command**: Each builder terminal issues exactly one
//!    `exec`; batching and retries belong to the transport.
//! 3. **Opaque Context**: `Context` is handed to the transport verbatim; the
//!    command layer never reads it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::arg::Arg;
use crate::error::TransportError;
use crate::reply::Reply;

/// Executes one command and returns its decoded reply.
///
/// Implementations must be safe to call from many threads at once.
pub trait Transport: Send + Sync {
    fn exec(&self, ctx: &Context, command: &str, args: &[Arg]) -> Result<Reply, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn exec(&self, ctx: &Context, command: &str, args: &[Arg]) -> Result<Reply, TransportError> {
        (**self).exec(ctx, command, args)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn exec(&self, ctx: &Context, command: &str, args: &[Arg]) -> Result<Reply, TransportError> {
        (**self).exec(ctx, command, args)
    }
}

/// Shared cancellation flag.
///
/// Clones observe the same flag; cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Per-call deadline and cancellation, passed through to the transport.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<CancelToken>,
}

impl Context {
    /// A context with no deadline and no cancellation.
    pub fn background() -> Self {
        Context::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Time left before the deadline; `Some(ZERO)` once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Fails with the matching transport error when the call must not proceed.
    pub fn check(&self) -> Result<(), TransportError> {
        if self.is_cancelled() {
            return Err(TransportError::Cancelled);
        }
        if self.remaining() == Some(Duration::ZERO) {
            return Err(TransportError::DeadlineExceeded);
        }
        Ok(())
    }
}
