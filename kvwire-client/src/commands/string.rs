//! String commands.

use std::sync::Arc;

use kvwire_common::{Arg, Context, Reply, Transport};

use super::{text_args, Dispatch};
use crate::command::{Cmd, Conditional, Expiry};

/// Options accepted by `SET`.
pub enum SetOptions {}

impl Conditional for SetOptions {
    const CONDITION_RANK: u8 = 1;
}

impl Expiry for SetOptions {}

impl<T> Cmd<T, SetOptions> {
    /// Keep the TTL already associated with the key.
    pub fn keepttl(self) -> Self {
        self.option(0, [Arg::Token("KEEPTTL")])
    }

    /// Return the previous value stored at key, or nil.
    pub fn get(self) -> Self {
        self.option(2, [Arg::Token("GET")])
    }
}

/// Options accepted by `GETEX`.
pub enum GetExOptions {}

impl Expiry for GetExOptions {}

impl<T> Cmd<T, GetExOptions> {
    /// Remove the TTL associated with the key.
    pub fn persist(self) -> Self {
        self.option(0, [Arg::Token("PERSIST")])
    }
}

pub trait StringCommands: Send + Sync {
    /// Command: APPEND key value
    /// Integer reply: the length of the string after the append operation.
    fn append(&self, ctx: &Context, key: &str, value: Arg) -> Cmd<i64>;

    /// Command: DECR key
    /// Integer reply: the value of key after the decrement.
    fn decr(&self, ctx: &Context, key: &str) -> Cmd<i64>;

    /// Command: DECRBY key decrement
    /// Integer reply: the value of key after the decrement.
    fn decr_by(&self, ctx: &Context, key: &str, decrement: i64) -> Cmd<i64>;

    /// Command: GET key
    /// Bulk string reply: the value of key, or nil when key does not exist.
    fn get(&self, ctx: &Context, key: &str) -> Cmd<String>;

    /// Command: GETDEL key
    /// Bulk string reply: the value of key, nil when key does not exist.
    fn get_del(&self, ctx: &Context, key: &str) -> Cmd<String>;

    /// Command: GETEX key [EX seconds|PX milliseconds|EXAT timestamp|PXAT milliseconds-timestamp|PERSIST]
    /// Bulk string reply: the value of key, or nil when key does not exist.
    fn get_ex(&self, ctx: &Context, key: &str) -> Cmd<String, GetExOptions>;

    /// Command: GETRANGE key start end
    /// Bulk string reply: the substring of the string value stored at key.
    fn get_range(&self, ctx: &Context, key: &str, start: i64, end: i64) -> Cmd<String>;

    /// Command: GETSET key value
    /// Bulk string reply: the old value stored at key, or nil when key did not exist.
    fn get_set(&self, ctx: &Context, key: &str, value: Arg) -> Cmd<String>;

    /// Command: INCR key
    /// Integer reply: the value of key after the increment.
    fn incr(&self, ctx: &Context, key: &str) -> Cmd<i64>;

    /// Command: INCRBY key increment
    /// Integer reply: the value of key after the increment.
    fn incr_by(&self, ctx: &Context, key: &str, increment: i64) -> Cmd<i64>;

    /// Command: INCRBYFLOAT key increment
    /// Bulk string reply: the value of key after the increment.
    fn incr_by_float(&self, ctx: &Context, key: &str, increment: f64) -> Cmd<f64>;

    /// Command: MGET key [key ...]
    /// Array reply: list of values at the specified keys, nil for missing keys.
    fn mget(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<Reply>>>;

    /// Command: MSET key value [key value ...]
    /// Simple string reply: always OK.
    fn mset(&self, ctx: &Context, pairs: &[(&str, Arg)]) -> Cmd<String>;

    /// Command: MSETNX key value [key value ...]
    /// Integer reply: 1 if all the keys were set, 0 if no key was set.
    fn mset_nx(&self, ctx: &Context, pairs: &[(&str, Arg)]) -> Cmd<i64>;

    /// Command: SET key value [NX|XX] [GET] [EX seconds|PX milliseconds|EXAT timestamp|PXAT milliseconds-timestamp|KEEPTTL]
    /// Simple string reply: OK if SET was executed correctly.
    fn set(&self, ctx: &Context, key: &str, value: Arg) -> Cmd<String, SetOptions>;

    /// Command: SETRANGE key offset value
    /// Integer reply: the length of the string after it was modified.
    fn set_range(&self, ctx: &Context, key: &str, offset: i64, value: Arg) -> Cmd<i64>;

    /// Command: STRLEN key
    /// Integer reply: the length of the string at key, or 0 when key does not exist.
    fn strlen(&self, ctx: &Context, key: &str) -> Cmd<i64>;
}

/// Default string commands.
pub struct StringOps {
    dispatch: Dispatch,
}

impl StringOps {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        StringOps {
            dispatch: Dispatch::new(transport),
        }
    }
}

fn flatten_pairs(pairs: &[(&str, Arg)]) -> Vec<Arg> {
    let mut args = Vec::with_capacity(pairs.len() * 2);
    for (key, value) in pairs {
        args.push(Arg::from(*key));
        args.push(value.clone());
    }
    args
}

impl StringCommands for StringOps {
    fn append(&self, ctx: &Context, key: &str, value: Arg) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "APPEND", vec![key.into(), value])
    }

    fn decr(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "DECR", vec![key.into()])
    }

    fn decr_by(&self, ctx: &Context, key: &str, decrement: i64) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "DECRBY", vec![key.into(), decrement.into()])
    }

    fn get(&self, ctx: &Context, key: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "GET", vec![key.into()])
    }

    fn get_del(&self, ctx: &Context, key: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "GETDEL", vec![key.into()])
    }

    fn get_ex(&self, ctx: &Context, key: &str) -> Cmd<String, GetExOptions> {
        self.dispatch.cmd(ctx, "GETEX", vec![key.into()])
    }

    fn get_range(&self, ctx: &Context, key: &str, start: i64, end: i64) -> Cmd<String> {
        self.dispatch
            .cmd(ctx, "GETRANGE", vec![key.into(), start.into(), end.into()])
    }

    fn get_set(&self, ctx: &Context, key: &str, value: Arg) -> Cmd<String> {
        self.dispatch.cmd(ctx, "GETSET", vec![key.into(), value])
    }

    fn incr(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "INCR", vec![key.into()])
    }

    fn incr_by(&self, ctx: &Context, key: &str, increment: i64) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "INCRBY", vec![key.into(), increment.into()])
    }

    fn incr_by_float(&self, ctx: &Context, key: &str, increment: f64) -> Cmd<f64> {
        self.dispatch
            .cmd(ctx, "INCRBYFLOAT", vec![key.into(), increment.into()])
    }

    fn mget(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<Reply>>> {
        self.dispatch.cmd(ctx, "MGET", text_args(keys).collect())
    }

    fn mset(&self, ctx: &Context, pairs: &[(&str, Arg)]) -> Cmd<String> {
        self.dispatch.cmd(ctx, "MSET", flatten_pairs(pairs))
    }

    fn mset_nx(&self, ctx: &Context, pairs: &[(&str, Arg)]) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "MSETNX", flatten_pairs(pairs))
    }

    fn set(&self, ctx: &Context, key: &str, value: Arg) -> Cmd<String, SetOptions> {
        self.dispatch.cmd(ctx, "SET", vec![key.into(), value])
    }

    fn set_range(&self, ctx: &Context, key: &str, offset: i64, value: Arg) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "SETRANGE", vec![key.into(), offset.into(), value])
    }

    fn strlen(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "STRLEN", vec![key.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_pairing, t, Recorder};

    fn ops() -> (Arc<Recorder>, StringOps) {
        let recorder = Recorder::new();
        let ops = StringOps::new(recorder.transport());
        (recorder, ops)
    }

    #[test]
    fn set_with_expiry_sends_value_before_flags() {
        let (recorder, ops) = ops();
        recorder.push("OK");
        let ctx = Context::background();

        let cmd = ops.set(&ctx, "a", "b".into()).ex(5);
        assert_eq!(cmd.name(), "SET");
        assert_eq!(cmd.args(), vec![t("a"), t("b"), Arg::Token("EX"), Arg::Int(5)]);
        assert_eq!(cmd.result().unwrap(), "OK");
        assert_eq!(recorder.calls().len(), 1);
    }

    #[test]
    fn set_orders_expiry_condition_and_get() {
        let (_, ops) = ops();
        let ctx = Context::background();

        let cmd = ops.set(&ctx, "k", Arg::Int(1)).get().nx().px(250);
        assert_eq!(
            cmd.args(),
            vec![
                t("k"),
                Arg::Int(1),
                Arg::Token("PX"),
                Arg::Int(250),
                Arg::Token("NX"),
                Arg::Token("GET"),
            ]
        );

        let cmd = ops.set(&ctx, "k", "v".into()).xx().keepttl();
        assert_eq!(
            cmd.args(),
            vec![t("k"), t("v"), Arg::Token("KEEPTTL"), Arg::Token("XX")]
        );
    }

    #[test]
    fn get_ex_options() {
        let (_, ops) = ops();
        let ctx = Context::background();
        assert_eq!(
            ops.get_ex(&ctx, "k").exat(1_700_000_000).args(),
            vec![t("k"), Arg::Token("EXAT"), Arg::Int(1_700_000_000)]
        );
        assert_eq!(
            ops.get_ex(&ctx, "k").persist().args(),
            vec![t("k"), Arg::Token("PERSIST")]
        );
    }

    #[test]
    fn scalar_replies_pair_with_their_coercers() {
        let (recorder, ops) = ops();
        let ctx = Context::background();

        recorder.push(Reply::Integer(6));
        assert_eq!(ops.append(&ctx, "k", "abc".into()).result().unwrap(), 6);

        recorder.push(Reply::Integer(-1));
        assert_eq!(ops.decr(&ctx, "k").result().unwrap(), -1);

        recorder.push(Reply::Integer(10));
        assert_eq!(ops.incr_by(&ctx, "k", 10).result().unwrap(), 10);

        recorder.push("10.5");
        assert_eq!(ops.incr_by_float(&ctx, "k", 0.5).result().unwrap(), 10.5);

        recorder.push(Reply::Nil);
        assert_eq!(ops.get(&ctx, "missing").result().unwrap(), "");

        recorder.push(Reply::Integer(3));
        assert_eq!(ops.strlen(&ctx, "k").result().unwrap(), 3);

        let names: Vec<String> = recorder.calls().into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec!["APPEND", "DECR", "INCRBY", "INCRBYFLOAT", "GET", "STRLEN"]
        );
    }

    #[test]
    fn mget_keeps_missing_keys_as_nil() {
        let (recorder, ops) = ops();
        let ctx = Context::background();
        recorder.push(vec![Reply::from("1"), Reply::Nil]);

        let cmd = ops.mget(&ctx, &["a", "b"]);
        assert_eq!(cmd.args(), vec![t("a"), t("b")]);
        assert_eq!(
            cmd.result().unwrap(),
            Some(vec![Reply::from("1"), Reply::Nil])
        );
    }

    #[test]
    fn mset_flattens_pairs() {
        let (recorder, ops) = ops();
        let ctx = Context::background();
        recorder.push(Reply::Integer(1));

        let cmd = ops.mset_nx(&ctx, &[("a", Arg::Int(1)), ("b", "x".into())]);
        assert_eq!(cmd.name(), "MSETNX");
        assert_eq!(cmd.args(), vec![t("a"), Arg::Int(1), t("b"), t("x")]);
        assert_eq!(cmd.result().unwrap(), 1);
    }

    #[test]
    fn ranges_and_offsets() {
        let (_, ops) = ops();
        let ctx = Context::background();
        assert_eq!(
            ops.get_range(&ctx, "k", 0, -1).args(),
            vec![t("k"), Arg::Int(0), Arg::Int(-1)]
        );
        assert_eq!(
            ops.set_range(&ctx, "k", 6, "Redis".into()).args(),
            vec![t("k"), Arg::Int(6), t("Redis")]
        );
    }

    #[test]
    fn every_command_pairs_with_its_reply() {
        let (recorder, ops) = ops();
        let ctx = Context::background();
        let r = &recorder;

        check_pairing(r, ops.append(&ctx, "k", t("xy")), &["APPEND", "k", "xy"], 5i64, 5);
        check_pairing(r, ops.decr(&ctx, "k"), &["DECR", "k"], -1i64, -1);
        check_pairing(r, ops.decr_by(&ctx, "k", 10), &["DECRBY", "k", "10"], -11i64, -11);
        check_pairing(r, ops.get(&ctx, "k"), &["GET", "k"], "v", "v".to_string());
        check_pairing(r, ops.get_del(&ctx, "k"), &["GETDEL", "k"], "v", "v".to_string());
        check_pairing(r, ops.get_ex(&ctx, "k").persist(), &["GETEX", "k", "PERSIST"], "v", "v".to_string());
        check_pairing(r, ops.get_range(&ctx, "k", 0, 2), &["GETRANGE", "k", "0", "2"], "abc", "abc".to_string());
        check_pairing(r, ops.get_set(&ctx, "k", t("new")), &["GETSET", "k", "new"], Reply::Nil, String::new());
        check_pairing(r, ops.incr(&ctx, "k"), &["INCR", "k"], 1i64, 1);
        check_pairing(r, ops.incr_by(&ctx, "k", 5), &["INCRBY", "k", "5"], 6i64, 6);
        check_pairing(
            r,
            ops.incr_by_float(&ctx, "k", 0.1),
            &["INCRBYFLOAT", "k", "0.1"],
            "6.1",
            6.1,
        );
        check_pairing(
            r,
            ops.mget(&ctx, &["a", "b"]),
            &["MGET", "a", "b"],
            vec![Reply::from("1"), Reply::Nil],
            Some(vec![Reply::from("1"), Reply::Nil]),
        );
        check_pairing(
            r,
            ops.mset(&ctx, &[("a", t("1")), ("b", Arg::Int(2))]),
            &["MSET", "a", "1", "b", "2"],
            "OK",
            "OK".to_string(),
        );
        check_pairing(r, ops.mset_nx(&ctx, &[("a", t("1"))]), &["MSETNX", "a", "1"], 0i64, 0);
        check_pairing(
            r,
            ops.set(&ctx, "k", t("v")).px(100).xx(),
            &["SET", "k", "v", "PX", "100", "XX"],
            "OK",
            "OK".to_string(),
        );
        check_pairing(r, ops.set_range(&ctx, "k", 6, t("x")), &["SETRANGE", "k", "6", "x"], 7i64, 7);
        check_pairing(r, ops.strlen(&ctx, "k"), &["STRLEN", "k"], 7i64, 7);
    }
}
