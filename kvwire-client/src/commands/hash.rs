//! Hash commands.

use std::sync::Arc;

use kvwire_common::{Arg, Context, Reply, TextMap, Transport};

use super::{with_texts, Dispatch};
use crate::command::Cmd;

pub trait HashCommands: Send + Sync {
    /// Command: HDEL key field [field ...]
    /// Integer reply: the number of fields that were removed from the hash.
    fn hdel(&self, ctx: &Context, key: &str, fields: &[&str]) -> Cmd<i64>;

    /// Command: HEXISTS key field
    /// Integer reply: 1 if the hash contains field, 0 otherwise.
    fn hexists(&self, ctx: &Context, key: &str, field: &str) -> Cmd<i64>;

    /// Command: HGET key field
    /// Bulk string reply: the value associated with field, or nil.
    fn hget(&self, ctx: &Context, key: &str, field: &str) -> Cmd<String>;

    /// Command: HGETALL key
    /// Array reply: list of fields and their values stored in the hash, or
    /// an absent map when key does not exist.
    fn hgetall(&self, ctx: &Context, key: &str) -> Cmd<Option<TextMap>>;

    /// Command: HINCRBY key field increment
    /// Integer reply: the value at field after the increment operation.
    fn hincr_by(&self, ctx: &Context, key: &str, field: &str, increment: i64) -> Cmd<i64>;

    /// Command: HINCRBYFLOAT key field increment
    /// Bulk string reply: the value of field after the increment.
    fn hincr_by_float(&self, ctx: &Context, key: &str, field: &str, increment: f64) -> Cmd<f64>;

    /// Command: HKEYS key
    /// Array reply: list of fields in the hash.
    fn hkeys(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<String>>>;

    /// Command: HLEN key
    /// Integer reply: number of fields in the hash, or 0 when key does not exist.
    fn hlen(&self, ctx: &Context, key: &str) -> Cmd<i64>;

    /// Command: HMGET key field [field ...]
    /// Array reply: list of values associated with the given fields, in the same order.
    fn hmget(&self, ctx: &Context, key: &str, fields: &[&str]) -> Cmd<Option<Vec<Reply>>>;

    /// Command: HSET key field value [field value ...]
    /// Integer reply: The number of fields that were added.
    fn hset(&self, ctx: &Context, key: &str, pairs: &[(&str, Arg)]) -> Cmd<i64>;

    /// Command: HSETNX key field value
    /// Integer reply: 1 if field is a new field in the hash and value was set, 0 otherwise.
    fn hset_nx(&self, ctx: &Context, key: &str, field: &str, value: Arg) -> Cmd<i64>;

    /// Command: HSTRLEN key field
    /// Integer reply: the string length of the value associated with field.
    fn hstrlen(&self, ctx: &Context, key: &str, field: &str) -> Cmd<i64>;

    /// Command: HVALS key
    /// Array reply: list of values in the hash.
    fn hvals(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<String>>>;
}

/// Default hash commands.
pub struct HashOps {
    dispatch: Dispatch,
}

impl HashOps {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        HashOps {
            dispatch: Dispatch::new(transport),
        }
    }
}

impl HashCommands for HashOps {
    fn hdel(&self, ctx: &Context, key: &str, fields: &[&str]) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "HDEL", with_texts(vec![key.into()], fields))
    }

    fn hexists(&self, ctx: &Context, key: &str, field: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "HEXISTS", vec![key.into(), field.into()])
    }

    fn hget(&self, ctx: &Context, key: &str, field: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "HGET", vec![key.into(), field.into()])
    }

    fn hgetall(&self, ctx: &Context, key: &str) -> Cmd<Option<TextMap>> {
        self.dispatch.cmd(ctx, "HGETALL", vec![key.into()])
    }

    fn hincr_by(&self, ctx: &Context, key: &str, field: &str, increment: i64) -> Cmd<i64> {
        self.dispatch.cmd(
            ctx,
            "HINCRBY",
            vec![key.into(), field.into(), increment.into()],
        )
    }

    fn hincr_by_float(&self, ctx: &Context, key: &str, field: &str, increment: f64) -> Cmd<f64> {
        self.dispatch.cmd(
            ctx,
            "HINCRBYFLOAT",
            vec![key.into(), field.into(), increment.into()],
        )
    }

    fn hkeys(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<String>>> {
        self.dispatch.cmd(ctx, "HKEYS", vec![key.into()])
    }

    fn hlen(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "HLEN", vec![key.into()])
    }

    fn hmget(&self, ctx: &Context, key: &str, fields: &[&str]) -> Cmd<Option<Vec<Reply>>> {
        self.dispatch
            .cmd(ctx, "HMGET", with_texts(vec![key.into()], fields))
    }

    fn hset(&self, ctx: &Context, key: &str, pairs: &[(&str, Arg)]) -> Cmd<i64> {
        let mut args = Vec::with_capacity(1 + pairs.len() * 2);
        args.push(Arg::from(key));
        for (field, value) in pairs {
            args.push(Arg::from(*field));
            args.push(value.clone());
        }
        self.dispatch.cmd(ctx, "HSET", args)
    }

    fn hset_nx(&self, ctx: &Context, key: &str, field: &str, value: Arg) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "HSETNX", vec![key.into(), field.into(), value])
    }

    fn hstrlen(&self, ctx: &Context, key: &str, field: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "HSTRLEN", vec![key.into(), field.into()])
    }

    fn hvals(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<String>>> {
        self.dispatch.cmd(ctx, "HVALS", vec![key.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_pairing, owned, t, texts, Recorder};
    use kvwire_common::WireError;

    fn ops() -> (Arc<Recorder>, HashOps) {
        let recorder = Recorder::new();
        let ops = HashOps::new(recorder.transport());
        (recorder, ops)
    }

    #[test]
    fn hset_flattens_field_value_pairs() {
        let (recorder, ops) = ops();
        recorder.push(Reply::Integer(2));
        let ctx = Context::background();

        let cmd = ops.hset(&ctx, "h", &[("f1", "v1".into()), ("f2", Arg::Int(2))]);
        assert_eq!(
            cmd.args(),
            vec![t("h"), t("f1"), t("v1"), t("f2"), Arg::Int(2)]
        );
        assert_eq!(cmd.result().unwrap(), 2);
    }

    #[test]
    fn hgetall_decodes_into_map() {
        let (recorder, ops) = ops();
        recorder.push(texts(&["f1", "v1", "f2", "v2"]));
        let ctx = Context::background();

        let map = ops.hgetall(&ctx, "h").result().unwrap().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("f1"), Some("v1"));
        assert_eq!(map.get("f2"), Some("v2"));
    }

    #[test]
    fn hgetall_missing_key_is_absent() {
        let (recorder, ops) = ops();
        recorder.push(Reply::Nil);
        let ctx = Context::background();
        assert_eq!(ops.hgetall(&ctx, "missing").result().unwrap(), None);
    }

    #[test]
    fn hgetall_odd_reply_is_malformed() {
        let (recorder, ops) = ops();
        recorder.push(texts(&["f1", "v1", "f2"]));
        let ctx = Context::background();
        assert!(matches!(
            ops.hgetall(&ctx, "h").result(),
            Err(WireError::MalformedReply { len: 3, .. })
        ));
    }

    #[test]
    fn hmget_keeps_nil_positions() {
        let (recorder, ops) = ops();
        recorder.push(vec![Reply::Nil, Reply::from("v")]);
        let ctx = Context::background();

        let cmd = ops.hmget(&ctx, "h", &["a", "b"]);
        assert_eq!(cmd.args(), vec![t("h"), t("a"), t("b")]);
        assert_eq!(
            cmd.result().unwrap(),
            Some(vec![Reply::Nil, Reply::from("v")])
        );
    }

    #[test]
    fn scalar_and_list_pairings() {
        let (recorder, ops) = ops();
        let ctx = Context::background();

        recorder.push("3.5");
        assert_eq!(
            ops.hincr_by_float(&ctx, "h", "f", 1.5).result().unwrap(),
            3.5
        );

        recorder.push(texts(&["a", "b"]));
        assert_eq!(
            ops.hkeys(&ctx, "h").result().unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        recorder.push(Reply::Integer(1));
        assert_eq!(ops.hdel(&ctx, "h", &["a"]).result().unwrap(), 1);

        let calls = recorder.calls();
        assert_eq!(calls[0].0, "HINCRBYFLOAT");
        assert_eq!(calls[0].1, vec![t("h"), t("f"), Arg::Float(1.5)]);
        assert_eq!(calls[2].1, vec![t("h"), t("a")]);
    }

    #[test]
    fn every_command_pairs_with_its_reply() {
        let (recorder, ops) = ops();
        let ctx = Context::background();
        let r = &recorder;

        check_pairing(r, ops.hdel(&ctx, "h", &["a", "b"]), &["HDEL", "h", "a", "b"], 1i64, 1);
        check_pairing(r, ops.hexists(&ctx, "h", "a"), &["HEXISTS", "h", "a"], 1i64, 1);
        check_pairing(r, ops.hget(&ctx, "h", "a"), &["HGET", "h", "a"], "v", "v".to_string());
        check_pairing(r, ops.hget(&ctx, "h", "zz"), &["HGET", "h", "zz"], Reply::Nil, String::new());
        check_pairing(
            r,
            ops.hgetall(&ctx, "h"),
            &["HGETALL", "h"],
            texts(&["a", "1"]),
            Some([("a", "1")].into_iter().collect()),
        );
        check_pairing(r, ops.hincr_by(&ctx, "h", "n", -3), &["HINCRBY", "h", "n", "-3"], 7i64, 7);
        check_pairing(
            r,
            ops.hincr_by_float(&ctx, "h", "n", 0.25),
            &["HINCRBYFLOAT", "h", "n", "0.25"],
            "1.25",
            1.25,
        );
        check_pairing(r, ops.hkeys(&ctx, "h"), &["HKEYS", "h"], texts(&["a", "b"]), Some(owned(&["a", "b"])));
        check_pairing(r, ops.hlen(&ctx, "h"), &["HLEN", "h"], 2i64, 2);
        check_pairing(
            r,
            ops.hmget(&ctx, "h", &["a", "zz"]),
            &["HMGET", "h", "a", "zz"],
            vec![Reply::from("1"), Reply::Nil],
            Some(vec![Reply::from("1"), Reply::Nil]),
        );
        check_pairing(
            r,
            ops.hset(&ctx, "h", &[("a", Arg::Int(1)), ("b", "x".into())]),
            &["HSET", "h", "a", "1", "b", "x"],
            2i64,
            2,
        );
        check_pairing(r, ops.hset_nx(&ctx, "h", "a", "v".into()), &["HSETNX", "h", "a", "v"], 0i64, 0);
        check_pairing(r, ops.hstrlen(&ctx, "h", "a"), &["HSTRLEN", "h", "a"], 5i64, 5);
        check_pairing(r, ops.hvals(&ctx, "h"), &["HVALS", "h"], Reply::Nil, None);
    }
}
