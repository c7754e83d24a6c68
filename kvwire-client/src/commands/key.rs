//! Generic key commands.

use std::sync::Arc;

use kvwire_common::{Context, Transport};

use super::{text_args, Dispatch};
use crate::command::{Cmd, Comparison, Conditional};

/// Options accepted by `EXPIRE`, `EXPIREAT`, `PEXPIRE` and `PEXPIREAT`.
pub enum ExpireOptions {}

impl Conditional for ExpireOptions {}

impl Comparison for ExpireOptions {}

pub trait KeyCommands: Send + Sync {
    /// Command: DEL key [key ...]
    /// Integer reply: The number of keys that were removed.
    fn del(&self, ctx: &Context, keys: &[&str]) -> Cmd<i64>;

    /// Command: DUMP key
    /// Bulk string reply: the serialized value, or nil when key does not exist.
    /// The payload is binary and is returned byte for byte; empty means nil.
    fn dump(&self, ctx: &Context, key: &str) -> Cmd<Vec<u8>>;

    /// Command: EXISTS key [key ...]
    /// Integer reply: The number of keys existing among the ones specified as arguments.
    fn exists(&self, ctx: &Context, keys: &[&str]) -> Cmd<i64>;

    /// Command: EXPIRE key seconds [NX|XX|GT|LT]
    /// Integer reply: 1 if the timeout was set, 0 if the timeout was not set.
    fn expire(&self, ctx: &Context, key: &str, seconds: i64) -> Cmd<i64, ExpireOptions>;

    /// Command: EXPIREAT key timestamp [NX|XX|GT|LT]
    /// Integer reply: 1 if the timeout was set, 0 if the timeout was not set.
    fn expire_at(&self, ctx: &Context, key: &str, timestamp: i64) -> Cmd<i64, ExpireOptions>;

    /// Command: KEYS pattern
    /// Array reply: list of keys matching pattern.
    fn keys(&self, ctx: &Context, pattern: &str) -> Cmd<Option<Vec<String>>>;

    /// Command: PERSIST key
    /// Integer reply: 1 if the timeout was removed, 0 otherwise.
    fn persist(&self, ctx: &Context, key: &str) -> Cmd<i64>;

    /// Command: PEXPIRE key milliseconds [NX|XX|GT|LT]
    /// Integer reply: 1 if the timeout was set, 0 if the timeout was not set.
    fn pexpire(&self, ctx: &Context, key: &str, milliseconds: i64) -> Cmd<i64, ExpireOptions>;

    /// Command: PEXPIREAT key milliseconds-timestamp [NX|XX|GT|LT]
    /// Integer reply: 1 if the timeout was set, 0 if the timeout was not set.
    fn pexpire_at(&self, ctx: &Context, key: &str, timestamp: i64) -> Cmd<i64, ExpireOptions>;

    /// Command: PTTL key
    /// Integer reply: TTL in milliseconds, -1 if the key exists
    /// but has no associated expire, -2 if the key does not exist.
    fn pttl(&self, ctx: &Context, key: &str) -> Cmd<i64>;

    /// Command: RANDOMKEY
    /// Bulk string reply: the random key, or nil when the database is empty.
    fn random_key(&self, ctx: &Context) -> Cmd<String>;

    /// Command: RENAME key newkey
    /// Simple string reply.
    fn rename(&self, ctx: &Context, key: &str, new_key: &str) -> Cmd<String>;

    /// Command: RENAMENX key newkey
    /// Integer reply: 1 if key was renamed to newkey, 0 if newkey already exists.
    fn rename_nx(&self, ctx: &Context, key: &str, new_key: &str) -> Cmd<i64>;

    /// Command: TOUCH key [key ...]
    /// Integer reply: The number of keys that were touched.
    fn touch(&self, ctx: &Context, keys: &[&str]) -> Cmd<i64>;

    /// Command: TTL key
    /// Integer reply: TTL in seconds, -1 if the key exists
    /// but has no associated expire, -2 if the key does not exist.
    fn ttl(&self, ctx: &Context, key: &str) -> Cmd<i64>;

    /// Command: TYPE key
    /// Simple string reply: type of key, or none when key does not exist.
    fn key_type(&self, ctx: &Context, key: &str) -> Cmd<String>;

    /// Command: UNLINK key [key ...]
    /// Integer reply: The number of keys that were unlinked.
    fn unlink(&self, ctx: &Context, keys: &[&str]) -> Cmd<i64>;
}

/// Default key commands.
pub struct KeyOps {
    dispatch: Dispatch,
}

impl KeyOps {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        KeyOps {
            dispatch: Dispatch::new(transport),
        }
    }

    fn multi(&self, ctx: &Context, name: &'static str, keys: &[&str]) -> Cmd<i64> {
        self.dispatch.cmd(ctx, name, text_args(keys).collect())
    }

    fn timed(&self, ctx: &Context, name: &'static str, key: &str, value: i64) -> Cmd<i64, ExpireOptions> {
        self.dispatch.cmd(ctx, name, vec![key.into(), value.into()])
    }
}

impl KeyCommands for KeyOps {
    fn del(&self, ctx: &Context, keys: &[&str]) -> Cmd<i64> {
        self.multi(ctx, "DEL", keys)
    }

    fn dump(&self, ctx: &Context, key: &str) -> Cmd<Vec<u8>> {
        self.dispatch.cmd(ctx, "DUMP", vec![key.into()])
    }

    fn exists(&self, ctx: &Context, keys: &[&str]) -> Cmd<i64> {
        self.multi(ctx, "EXISTS", keys)
    }

    fn expire(&self, ctx: &Context, key: &str, seconds: i64) -> Cmd<i64, ExpireOptions> {
        self.timed(ctx, "EXPIRE", key, seconds)
    }

    fn expire_at(&self, ctx: &Context, key: &str, timestamp: i64) -> Cmd<i64, ExpireOptions> {
        self.timed(ctx, "EXPIREAT", key, timestamp)
    }

    fn keys(&self, ctx: &Context, pattern: &str) -> Cmd<Option<Vec<String>>> {
        self.dispatch.cmd(ctx, "KEYS", vec![pattern.into()])
    }

    fn persist(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "PERSIST", vec![key.into()])
    }

    fn pexpire(&self, ctx: &Context, key: &str, milliseconds: i64) -> Cmd<i64, ExpireOptions> {
        self.timed(ctx, "PEXPIRE", key, milliseconds)
    }

    fn pexpire_at(&self, ctx: &Context, key: &str, timestamp: i64) -> Cmd<i64, ExpireOptions> {
        self.timed(ctx, "PEXPIREAT", key, timestamp)
    }

    fn pttl(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "PTTL", vec![key.into()])
    }

    fn random_key(&self, ctx: &Context) -> Cmd<String> {
        self.dispatch.cmd(ctx, "RANDOMKEY", Vec::new())
    }

    fn rename(&self, ctx: &Context, key: &str, new_key: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "RENAME", vec![key.into(), new_key.into()])
    }

    fn rename_nx(&self, ctx: &Context, key: &str, new_key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "RENAMENX", vec![key.into(), new_key.into()])
    }

    fn touch(&self, ctx: &Context, keys: &[&str]) -> Cmd<i64> {
        self.multi(ctx, "TOUCH", keys)
    }

    fn ttl(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "TTL", vec![key.into()])
    }

    fn key_type(&self, ctx: &Context, key: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "TYPE", vec![key.into()])
    }

    fn unlink(&self, ctx: &Context, keys: &[&str]) -> Cmd<i64> {
        self.multi(ctx, "UNLINK", keys)
    }
}
