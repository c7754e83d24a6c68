//! # kvwire Typed Client
//!
//! Purpose: Provide one typed, fluent method per server command, grouped by
//! data-type family, on top of any [`Transport`].
//!
//! ## Design Principles
//! 1. **Builder Pattern**: Commands are assembled first and executed by a
//!    single terminal `result()` call.
//! 2. **Static Reply Pairing**: Each command's output type selects the
//!    coercer that decodes its reply.
//! 3. **Decorator Pattern**: Any family can be wrapped at construction time.
//! 4. **Pluggable Transport**: A blocking RESP transport with connection and
//!    buffer pooling ships in the box; anything implementing `Transport`
//!    works.
//!
//! ```no_run
//! use std::sync::Arc;
//! use kvwire_client::{Client, Context, RespTransport};
//!
//! let client = Client::new(Arc::new(RespTransport::connect("127.0.0.1:6379")));
//! let ctx = Context::background();
//! let reply = client.strings().set(&ctx, "greeting", "hello".into()).ex(60).result()?;
//! assert_eq!(reply, "OK");
//! # Ok::<(), kvwire_client::WireError>(())
//! ```

mod client;
mod command;
pub mod commands;
mod config;
mod pool;
mod resp;
mod transport;

#[cfg(test)]
mod testing;

pub use client::{Client, ClientBuilder};
pub use command::{Cmd, Comparison, Conditional, Expiry, NoOptions};
pub use config::TransportConfig;
pub use pool::{BufferPool, PooledBuffer};
pub use transport::RespTransport;

pub use kvwire_common::{
    Arg, CancelToken, Context, LegacyResult, Reply, ReplyKind, ScoreMember, TextMap, Transport,
    TransportError, WireError, WireResult,
};
