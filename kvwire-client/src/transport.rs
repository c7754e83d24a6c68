//! # RESP Transport
//!
//! Purpose: Execute commands against a RESP server over pooled blocking TCP
//! connections.
//!
//! ## Design Principles
//! 1. **Adapter Pattern**: Implements the transport contract on top of the
//!    connection pool and the RESP codec.
//! 2. **Explicit Resources**: The buffer pool belongs to the transport and
//!    is never global.
//! 3. **Context Aware**: Cancellation is checked before any I/O; a deadline
//!    caps the socket timeouts of the call.

use std::io;
use std::time::Duration;

use kvwire_common::{Arg, Context, Reply, Transport, TransportError};
use tracing::{debug, warn};

use crate::config::TransportConfig;
use crate::pool::{BufferPool, ConnectionPool};
use crate::resp::encode_command;

/// Blocking RESP transport with connection and buffer pooling.
pub struct RespTransport {
    pool: ConnectionPool,
    buffers: BufferPool,
}

impl RespTransport {
    /// Creates a transport with default settings for `addr`.
    ///
    /// No connection is opened until the first command.
    pub fn connect(addr: impl Into<String>) -> Self {
        Self::with_config(TransportConfig::with_addr(addr))
    }

    pub fn with_config(config: TransportConfig) -> Self {
        debug!(
            addr = %config.addr,
            max_total = config.max_total,
            max_idle = config.max_idle,
            "resp transport configured"
        );
        let buffers = BufferPool::new(config.max_buffers, config.buffer_capacity);
        RespTransport {
            pool: ConnectionPool::new(config),
            buffers,
        }
    }
}

impl Transport for RespTransport {
    fn exec(&self, ctx: &Context, command: &str, args: &[Arg]) -> Result<Reply, TransportError> {
        ctx.check()?;

        let mut frame = self.buffers.acquire();
        encode_command(command, args, &mut frame);

        let mut conn = self.pool.acquire()?;
        match conn.exec(&frame, ctx.remaining()) {
            Ok(reply) => Ok(reply),
            Err(TransportError::Io(err)) if timed_out(&err) && deadline_passed(ctx) => {
                warn!(command, "deadline exceeded");
                Err(TransportError::DeadlineExceeded)
            }
            Err(err) => {
                if !matches!(err, TransportError::Server { .. }) {
                    warn!(command, error = %err, "dropping connection");
                }
                Err(err)
            }
        }
    }
}

fn timed_out(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}

fn deadline_passed(ctx: &Context) -> bool {
    ctx.remaining() == Some(Duration::ZERO)
}
