//! Set commands.

use std::sync::Arc;

use kvwire_common::{Arg, Context, Transport};

use super::{text_args, with_texts, with_values, Dispatch};
use crate::command::Cmd;

pub trait SetCommands: Send + Sync {
    /// Command: SADD key member [member ...]
    /// Integer reply: the number of elements that were added to the set.
    fn sadd(&self, ctx: &Context, key: &str, members: &[Arg]) -> Cmd<i64>;

    /// Command: SCARD key
    /// Integer reply: the cardinality (number of elements) of the set.
    fn scard(&self, ctx: &Context, key: &str) -> Cmd<i64>;

    /// Command: SDIFF key [key ...]
    /// Array reply: list with members of the resulting set.
    fn sdiff(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>>;

    /// Command: SDIFFSTORE destination key [key ...]
    /// Integer reply: the number of elements in the resulting set.
    fn sdiff_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> Cmd<i64>;

    /// Command: SINTER key [key ...]
    /// Array reply: list with members of the resulting set.
    fn sinter(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>>;

    /// Command: SINTERSTORE destination key [key ...]
    /// Integer reply: the number of elements in the resulting set.
    fn sinter_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> Cmd<i64>;

    /// Command: SISMEMBER key member
    /// Integer reply: 1 if the element is a member of the set, 0 otherwise.
    fn sis_member(&self, ctx: &Context, key: &str, member: Arg) -> Cmd<i64>;

    /// Command: SMEMBERS key
    /// Array reply: all elements of the set.
    fn smembers(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<String>>>;

    /// Command: SMISMEMBER key member [member ...]
    /// Array reply: list representing the membership of the given elements,
    /// in the same order as they are requested.
    fn smis_member(&self, ctx: &Context, key: &str, members: &[Arg]) -> Cmd<Option<Vec<i64>>>;

    /// Command: SMOVE source destination member
    /// Integer reply: 1 if the element is moved, 0 otherwise.
    fn smove(&self, ctx: &Context, source: &str, destination: &str, member: Arg) -> Cmd<i64>;

    /// Command: SPOP key
    /// Bulk string reply: the removed member, or nil when key does not exist.
    fn spop(&self, ctx: &Context, key: &str) -> Cmd<String>;

    /// Command: SPOP key count
    /// Array reply: the removed members, or an empty array when key does not exist.
    fn spop_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>>;

    /// Command: SRANDMEMBER key
    /// Bulk string reply: the randomly selected element, or nil when key does not exist.
    fn srand_member(&self, ctx: &Context, key: &str) -> Cmd<String>;

    /// Command: SRANDMEMBER key count
    /// Array reply: an array of elements, or an empty array when key does not exist.
    fn srand_member_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>>;

    /// Command: SREM key member [member ...]
    /// Integer reply: the number of members that were removed from the set.
    fn srem(&self, ctx: &Context, key: &str, members: &[Arg]) -> Cmd<i64>;

    /// Command: SUNION key [key ...]
    /// Array reply: list with members of the resulting set.
    fn sunion(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>>;

    /// Command: SUNIONSTORE destination key [key ...]
    /// Integer reply: the number of elements in the resulting set.
    fn sunion_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> Cmd<i64>;
}

/// Default set commands.
pub struct SetOps {
    dispatch: Dispatch,
}

impl SetOps {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        SetOps {
            dispatch: Dispatch::new(transport),
        }
    }

    fn keyed<T>(&self, ctx: &Context, name: &'static str, keys: &[&str]) -> Cmd<T> {
        self.dispatch.cmd(ctx, name, text_args(keys).collect())
    }

    fn store(&self, ctx: &Context, name: &'static str, destination: &str, keys: &[&str]) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, name, with_texts(vec![destination.into()], keys))
    }
}

impl SetCommands for SetOps {
    fn sadd(&self, ctx: &Context, key: &str, members: &[Arg]) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "SADD", with_values(vec![key.into()], members))
    }

    fn scard(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "SCARD", vec![key.into()])
    }

    fn sdiff(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>> {
        self.keyed(ctx, "SDIFF", keys)
    }

    fn sdiff_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> Cmd<i64> {
        self.store(ctx, "SDIFFSTORE", destination, keys)
    }

    fn sinter(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>> {
        self.keyed(ctx, "SINTER", keys)
    }

    fn sinter_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> Cmd<i64> {
        self.store(ctx, "SINTERSTORE", destination, keys)
    }

    fn sis_member(&self, ctx: &Context, key: &str, member: Arg) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "SISMEMBER", vec![key.into(), member])
    }

    fn smembers(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<String>>> {
        self.dispatch.cmd(ctx, "SMEMBERS", vec![key.into()])
    }

    fn smis_member(&self, ctx: &Context, key: &str, members: &[Arg]) -> Cmd<Option<Vec<i64>>> {
        self.dispatch
            .cmd(ctx, "SMISMEMBER", with_values(vec![key.into()], members))
    }

    fn smove(&self, ctx: &Context, source: &str, destination: &str, member: Arg) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "SMOVE", vec![source.into(), destination.into(), member])
    }

    fn spop(&self, ctx: &Context, key: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "SPOP", vec![key.into()])
    }

    fn spop_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>> {
        self.dispatch.cmd(ctx, "SPOP", vec![key.into(), count.into()])
    }

    fn srand_member(&self, ctx: &Context, key: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "SRANDMEMBER", vec![key.into()])
    }

    fn srand_member_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>> {
        self.dispatch
            .cmd(ctx, "SRANDMEMBER", vec![key.into(), count.into()])
    }

    fn srem(&self, ctx: &Context, key: &str, members: &[Arg]) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "SREM", with_values(vec![key.into()], members))
    }

    fn sunion(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>> {
        self.keyed(ctx, "SUNION", keys)
    }

    fn sunion_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> Cmd<i64> {
        self.store(ctx, "SUNIONSTORE", destination, keys)
    }
}
