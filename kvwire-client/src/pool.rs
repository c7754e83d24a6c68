//! # Connection and Buffer Pools
//!
//! Purpose: Reuse TCP connections and encode buffers across commands to
//! reduce handshake latency and allocation churn.
//!
//! ## Design Principles
//! 1. **Object Pool Pattern**: Keep bounded sets of reusable connections
//!    and buffers.
//! 2. **Minimal Locking**: Hold a mutex only while moving idle objects.
//! 3. **Fail Fast**: Exceeding the connection limit returns an error immediately.
//! 4. **RAII Release**: Guards hand objects back on every exit path,
//!    including errors and panics.

use std::collections::VecDeque;
use std::io::{BufReader, Write};
use std::net::{SocketAddr, TcpStream};
use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::BytesMut;
use kvwire_common::{Reply, TransportError};
use tracing::debug;

use crate::config::TransportConfig;
use crate::resp::read_reply;

struct PoolState {
    idle: VecDeque<Connection>,
    total: usize,
}

struct PoolInner {
    config: TransportConfig,
    state: Mutex<PoolState>,
}

/// Connection pool handle.
#[derive(Clone)]
pub struct ConnectionPool {
    inner: Arc<PoolInner>,
}

impl ConnectionPool {
    /// Creates an empty pool; connections are opened lazily.
    pub fn new(config: TransportConfig) -> Self {
        let state = PoolState {
            idle: VecDeque::with_capacity(config.max_idle),
            total: 0,
        };
        ConnectionPool {
            inner: Arc::new(PoolInner {
                config,
                state: Mutex::new(state),
            }),
        }
    }

    /// Acquires a connection from the pool.
    pub fn acquire(&self) -> Result<PooledConnection, TransportError> {
        if let Some(conn) = self.pop_idle() {
            return Ok(PooledConnection::new(self.clone(), conn));
        }

        if !self.try_reserve() {
            return Err(TransportError::PoolExhausted);
        }

        match Connection::connect(&self.inner.config) {
            Ok(conn) => {
                debug!(addr = %self.inner.config.addr, "opened connection");
                Ok(PooledConnection::new(self.clone(), conn))
            }
            Err(err) => {
                self.release_slot();
                Err(err)
            }
        }
    }

    fn pop_idle(&self) -> Option<Connection> {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        state.idle.pop_front()
    }

    fn try_reserve(&self) -> bool {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        if state.total >= self.inner.config.max_total {
            return false;
        }
        state.total += 1;
        true
    }

    fn release_slot(&self) {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        state.total = state.total.saturating_sub(1);
    }

    fn return_connection(&self, conn: Connection) {
        let mut state = self.inner.state.lock().expect("pool mutex poisoned");
        if state.idle.len() < self.inner.config.max_idle {
            state.idle.push_back(conn);
        } else {
            state.total = state.total.saturating_sub(1);
        }
    }
}

/// RAII wrapper returning a connection to the pool on drop.
pub struct PooledConnection {
    pool: ConnectionPool,
    conn: Option<Connection>,
    valid: bool,
}

impl PooledConnection {
    fn new(pool: ConnectionPool, conn: Connection) -> Self {
        PooledConnection {
            pool,
            conn: Some(conn),
            valid: true,
        }
    }

    /// Writes one encoded command and reads its reply.
    ///
    /// `limit` caps the socket timeouts for this call only.
    pub fn exec(&mut self, frame: &[u8], limit: Option<Duration>) -> Result<Reply, TransportError> {
        let conn = self.conn.as_mut().expect("connection exists");
        let reply = conn.exec(frame, limit);
        if let Err(err) = &reply {
            // A server error reply leaves the stream in sync; anything else
            // means the connection cannot be trusted.
            if !matches!(err, TransportError::Server { .. }) {
                self.valid = false;
            }
        }
        reply
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => return,
        };

        if self.valid {
            self.pool.return_connection(conn);
        } else {
            self.pool.release_slot();
        }
    }
}

/// Single TCP connection with a reusable line buffer.
struct Connection {
    // Buffered reader reduces syscalls while still allowing direct writes.
    reader: BufReader<TcpStream>,
    line_buf: Vec<u8>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
}

impl Connection {
    fn connect(config: &TransportConfig) -> Result<Self, TransportError> {
        let stream = connect_stream(config)?;
        // Disable Nagle to keep request latency low for small payloads.
        stream.set_nodelay(true)?;

        Ok(Connection {
            reader: BufReader::new(stream),
            line_buf: Vec::with_capacity(128),
            read_timeout: config.read_timeout(),
            write_timeout: config.write_timeout(),
        })
    }

    fn exec(&mut self, frame: &[u8], limit: Option<Duration>) -> Result<Reply, TransportError> {
        let stream = self.reader.get_mut();
        stream.set_read_timeout(clamp(self.read_timeout, limit))?;
        stream.set_write_timeout(clamp(self.write_timeout, limit))?;

        stream.write_all(frame)?;
        stream.flush()?;

        read_reply(&mut self.reader, &mut self.line_buf)
    }
}

/// Smaller of the configured timeout and the per-call limit. Never zero,
/// which the socket API rejects.
fn clamp(configured: Option<Duration>, limit: Option<Duration>) -> Option<Duration> {
    let timeout = match (configured, limit) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    timeout.map(|t| t.max(Duration::from_millis(1)))
}

fn connect_stream(config: &TransportConfig) -> Result<TcpStream, TransportError> {
    let addr: SocketAddr = config
        .addr
        .parse()
        .map_err(|_| TransportError::InvalidAddress)?;
    let stream = match config.connect_timeout() {
        Some(timeout) => TcpStream::connect_timeout(&addr, timeout)?,
        None => TcpStream::connect(addr)?,
    };
    Ok(stream)
}

/// Bounded pool of encode buffers.
///
/// A borrowed buffer is owned by its guard until dropped; its contents are
/// cleared before anyone else can see it.
pub struct BufferPool {
    idle: Mutex<Vec<BytesMut>>,
    max_idle: usize,
    capacity: usize,
}

impl BufferPool {
    pub fn new(max_idle: usize, capacity: usize) -> Self {
        BufferPool {
            idle: Mutex::new(Vec::with_capacity(max_idle)),
            max_idle,
            capacity,
        }
    }

    /// Borrows an empty buffer, allocating one when none is idle.
    pub fn acquire(&self) -> PooledBuffer<'_> {
        let reused = self.idle.lock().expect("pool mutex poisoned").pop();
        let buf = reused.unwrap_or_else(|| BytesMut::with_capacity(self.capacity));
        PooledBuffer {
            pool: self,
            buf: Some(buf),
        }
    }

    /// Number of buffers waiting for reuse.
    pub fn idle(&self) -> usize {
        self.idle.lock().expect("pool mutex poisoned").len()
    }

    fn release(&self, mut buf: BytesMut) {
        buf.clear();
        let mut idle = self.idle.lock().expect("pool mutex poisoned");
        if idle.len() < self.max_idle {
            idle.push(buf);
        }
    }
}

/// RAII guard over a borrowed buffer.
pub struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: Option<BytesMut>,
}

impl Deref for PooledBuffer<'_> {
    type Target = BytesMut;

    fn deref(&self) -> &BytesMut {
        self.buf.as_ref().expect("buffer exists")
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut BytesMut {
        self.buf.as_mut().expect("buffer exists")
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}
