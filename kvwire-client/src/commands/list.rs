//! List commands.

use std::sync::Arc;

use kvwire_common::{Arg, Context, Transport};

use super::{with_values, Dispatch};
use crate::command::Cmd;

/// End of a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn token(self) -> Arg {
        match self {
            Side::Left => Arg::Token("LEFT"),
            Side::Right => Arg::Token("RIGHT"),
        }
    }
}

/// Options accepted by `LPOS`. `COUNT` sits between `RANK` and `MAXLEN`.
pub enum LPosOptions {}

const LPOS_RANK: u8 = 0;
const LPOS_COUNT: u8 = 1;
const LPOS_MAXLEN: u8 = 2;

impl<T> Cmd<T, LPosOptions> {
    /// Skip the first `rank - 1` matches; negative ranks search from the tail.
    pub fn rank(self, rank: i64) -> Self {
        self.option(LPOS_RANK, [Arg::Token("RANK"), Arg::Int(rank)])
    }

    /// Compare at most `len` elements.
    pub fn maxlen(self, len: i64) -> Self {
        self.option(LPOS_MAXLEN, [Arg::Token("MAXLEN"), Arg::Int(len)])
    }
}

pub trait ListCommands: Send + Sync {
    /// Command: LINDEX key index
    /// Bulk string reply: the requested element, or nil when index is out of range.
    fn lindex(&self, ctx: &Context, key: &str, index: i64) -> Cmd<String>;

    /// Command: LINSERT key BEFORE pivot element
    /// Integer reply: the length of the list after the insert operation,
    /// or -1 when the value pivot was not found.
    fn linsert_before(&self, ctx: &Context, key: &str, pivot: Arg, value: Arg) -> Cmd<i64>;

    /// Command: LINSERT key AFTER pivot element
    /// Integer reply: the length of the list after the insert operation,
    /// or -1 when the value pivot was not found.
    fn linsert_after(&self, ctx: &Context, key: &str, pivot: Arg, value: Arg) -> Cmd<i64>;

    /// Command: LLEN key
    /// Integer reply: the length of the list at key.
    fn llen(&self, ctx: &Context, key: &str) -> Cmd<i64>;

    /// Command: LMOVE source destination LEFT|RIGHT LEFT|RIGHT
    /// Bulk string reply: the element being popped and pushed.
    fn lmove(
        &self,
        ctx: &Context,
        source: &str,
        destination: &str,
        from: Side,
        to: Side,
    ) -> Cmd<String>;

    /// Command: LPOP key
    /// Bulk string reply: the value of the first element, or nil when key does not exist.
    fn lpop(&self, ctx: &Context, key: &str) -> Cmd<String>;

    /// Command: LPOP key count
    /// Array reply: list of popped elements, or nil when key does not exist.
    fn lpop_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>>;

    /// Command: LPOS key element [RANK rank] [MAXLEN len]
    /// Integer reply: the index of the matching element, 0 when decoding a nil.
    fn lpos(&self, ctx: &Context, key: &str, element: Arg) -> Cmd<i64, LPosOptions>;

    /// Command: LPOS key element [RANK rank] COUNT num-matches [MAXLEN len]
    /// Array reply: the indexes of the matching elements.
    fn lpos_n(
        &self,
        ctx: &Context,
        key: &str,
        element: Arg,
        count: i64,
    ) -> Cmd<Option<Vec<i64>>, LPosOptions>;

    /// Command: LPUSH key element [element ...]
    /// Integer reply: the length of the list after the push operations.
    fn lpush(&self, ctx: &Context, key: &str, values: &[Arg]) -> Cmd<i64>;

    /// Command: LPUSHX key element [element ...]
    /// Integer reply: the length of the list after the push operation.
    fn lpush_x(&self, ctx: &Context, key: &str, values: &[Arg]) -> Cmd<i64>;

    /// Command: LRANGE key start stop
    /// Array reply: list of elements in the specified range.
    fn lrange(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> Cmd<Option<Vec<String>>>;

    /// Command: LREM key count element
    /// Integer reply: the number of removed elements.
    fn lrem(&self, ctx: &Context, key: &str, count: i64, value: Arg) -> Cmd<i64>;

    /// Command: LSET key index element
    /// Simple string reply
    fn lset(&self, ctx: &Context, key: &str, index: i64, value: Arg) -> Cmd<String>;

    /// Command: LTRIM key start stop
    /// Simple string reply
    fn ltrim(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> Cmd<String>;

    /// Command: RPOP key
    /// Bulk string reply: the value of the last element, or nil when key does not exist.
    fn rpop(&self, ctx: &Context, key: &str) -> Cmd<String>;

    /// Command: RPOP key count
    /// Array reply: list of popped elements, or nil when key does not exist.
    fn rpop_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>>;

    /// Command: RPOPLPUSH source destination
    /// Bulk string reply: the element being popped and pushed.
    fn rpop_lpush(&self, ctx: &Context, source: &str, destination: &str) -> Cmd<String>;

    /// Command: RPUSH key element [element ...]
    /// Integer reply: the length of the list after the push operation.
    fn rpush(&self, ctx: &Context, key: &str, values: &[Arg]) -> Cmd<i64>;

    /// Command: RPUSHX key element [element ...]
    /// Integer reply: the length of the list after the push operation.
    fn rpush_x(&self, ctx: &Context, key: &str, values: &[Arg]) -> Cmd<i64>;
}

/// Default list commands.
pub struct ListOps {
    dispatch: Dispatch,
}

impl ListOps {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ListOps {
            dispatch: Dispatch::new(transport),
        }
    }
}

impl ListCommands for ListOps {
    fn lindex(&self, ctx: &Context, key: &str, index: i64) -> Cmd<String> {
        self.dispatch.cmd(ctx, "LINDEX", vec![key.into(), index.into()])
    }

    fn linsert_before(&self, ctx: &Context, key: &str, pivot: Arg, value: Arg) -> Cmd<i64> {
        self.dispatch.cmd(
            ctx,
            "LINSERT",
            vec![key.into(), Arg::Token("BEFORE"), pivot, value],
        )
    }

    fn linsert_after(&self, ctx: &Context, key: &str, pivot: Arg, value: Arg) -> Cmd<i64> {
        self.dispatch.cmd(
            ctx,
            "LINSERT",
            vec![key.into(), Arg::Token("AFTER"), pivot, value],
        )
    }

    fn llen(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "LLEN", vec![key.into()])
    }

    fn lmove(
        &self,
        ctx: &Context,
        source: &str,
        destination: &str,
        from: Side,
        to: Side,
    ) -> Cmd<String> {
        self.dispatch.cmd(
            ctx,
            "LMOVE",
            vec![source.into(), destination.into(), from.token(), to.token()],
        )
    }

    fn lpop(&self, ctx: &Context, key: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "LPOP", vec![key.into()])
    }

    fn lpop_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>> {
        self.dispatch.cmd(ctx, "LPOP", vec![key.into(), count.into()])
    }

    fn lpos(&self, ctx: &Context, key: &str, element: Arg) -> Cmd<i64, LPosOptions> {
        self.dispatch.cmd(ctx, "LPOS", vec![key.into(), element])
    }

    fn lpos_n(
        &self,
        ctx: &Context,
        key: &str,
        element: Arg,
        count: i64,
    ) -> Cmd<Option<Vec<i64>>, LPosOptions> {
        self.dispatch
            .cmd(ctx, "LPOS", vec![key.into(), element])
            .option(LPOS_COUNT, [Arg::Token("COUNT"), Arg::Int(count)])
    }

    fn lpush(&self, ctx: &Context, key: &str, values: &[Arg]) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "LPUSH", with_values(vec![key.into()], values))
    }

    fn lpush_x(&self, ctx: &Context, key: &str, values: &[Arg]) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "LPUSHX", with_values(vec![key.into()], values))
    }

    fn lrange(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> Cmd<Option<Vec<String>>> {
        self.dispatch
            .cmd(ctx, "LRANGE", vec![key.into(), start.into(), stop.into()])
    }

    fn lrem(&self, ctx: &Context, key: &str, count: i64, value: Arg) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "LREM", vec![key.into(), count.into(), value])
    }

    fn lset(&self, ctx: &Context, key: &str, index: i64, value: Arg) -> Cmd<String> {
        self.dispatch
            .cmd(ctx, "LSET", vec![key.into(), index.into(), value])
    }

    fn ltrim(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> Cmd<String> {
        self.dispatch
            .cmd(ctx, "LTRIM", vec![key.into(), start.into(), stop.into()])
    }

    fn rpop(&self, ctx: &Context, key: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "RPOP", vec![key.into()])
    }

    fn rpop_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>> {
        self.dispatch.cmd(ctx, "RPOP", vec![key.into(), count.into()])
    }

    fn rpop_lpush(&self, ctx: &Context, source: &str, destination: &str) -> Cmd<String> {
        self.dispatch
            .cmd(ctx, "RPOPLPUSH", vec![source.into(), destination.into()])
    }

    fn rpush(&self, ctx: &Context, key: &str, values: &[Arg]) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "RPUSH", with_values(vec![key.into()], values))
    }

    fn rpush_x(&self, ctx: &Context, key: &str, values: &[Arg]) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "RPUSHX", with_values(vec![key.into()], values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_pairing, owned, t, texts, Recorder};
    use kvwire_common::Reply;

    fn ops() -> (Arc<Recorder>, ListOps) {
        let recorder = Recorder::new();
        let ops = ListOps::new(recorder.transport());
        (recorder, ops)
    }

    #[test]
    fn lpos_sends_lpos() {
        let (recorder, ops) = ops();
        recorder.push(Reply::Integer(2));
        let ctx = Context::background();

        let cmd = ops.lpos(&ctx, "l", "c".into()).maxlen(10).rank(-1);
        assert_eq!(cmd.name(), "LPOS");
        assert_eq!(
            cmd.args(),
            vec![
                t("l"),
                t("c"),
                Arg::Token("RANK"),
                Arg::Int(-1),
                Arg::Token("MAXLEN"),
                Arg::Int(10),
            ]
        );
        assert_eq!(cmd.result().unwrap(), 2);
        assert_eq!(recorder.calls()[0].0, "LPOS");
    }

    #[test]
    fn lpos_no_match_decodes_to_zero() {
        let (recorder, ops) = ops();
        recorder.push(Reply::Nil);
        let ctx = Context::background();
        assert_eq!(ops.lpos(&ctx, "l", "z".into()).result().unwrap(), 0);
    }

    #[test]
    fn lpos_count_decodes_integer_list() {
        let (recorder, ops) = ops();
        recorder.push(vec![Reply::Integer(2), Reply::Integer(6)]);
        let ctx = Context::background();

        let cmd = ops.lpos_n(&ctx, "l", "c".into(), 0).maxlen(100).rank(2);
        assert_eq!(
            cmd.args(),
            vec![
                t("l"),
                t("c"),
                Arg::Token("RANK"),
                Arg::Int(2),
                Arg::Token("COUNT"),
                Arg::Int(0),
                Arg::Token("MAXLEN"),
                Arg::Int(100),
            ]
        );
        assert_eq!(cmd.result().unwrap(), Some(vec![2, 6]));
    }

    #[test]
    fn lmove_takes_directions() {
        let (recorder, ops) = ops();
        recorder.push("three");
        let ctx = Context::background();

        let cmd = ops.lmove(&ctx, "src", "dst", Side::Right, Side::Left);
        assert_eq!(
            cmd.args(),
            vec![t("src"), t("dst"), Arg::Token("RIGHT"), Arg::Token("LEFT")]
        );
        assert_eq!(cmd.result().unwrap(), "three");
    }

    #[test]
    fn pushes_flatten_values() {
        let (recorder, ops) = ops();
        recorder.push(Reply::Integer(3));
        let ctx = Context::background();

        let cmd = ops.rpush(&ctx, "l", &["a".into(), Arg::Int(2), Arg::Float(0.5)]);
        assert_eq!(
            cmd.args(),
            vec![t("l"), t("a"), Arg::Int(2), Arg::Float(0.5)]
        );
        assert_eq!(cmd.result().unwrap(), 3);
    }

    #[test]
    fn pops_pair_with_scalar_and_list_coercers() {
        let (recorder, ops) = ops();
        let ctx = Context::background();

        recorder.push("a");
        assert_eq!(ops.lpop(&ctx, "l").result().unwrap(), "a");

        recorder.push(texts(&["b", "c"]));
        assert_eq!(
            ops.rpop_n(&ctx, "l", 2).result().unwrap(),
            Some(vec!["b".to_string(), "c".to_string()])
        );

        recorder.push(Reply::Nil);
        assert_eq!(ops.lpop_n(&ctx, "missing", 2).result().unwrap(), None);

        let calls = recorder.calls();
        assert_eq!(calls[1].1, vec![t("l"), Arg::Int(2)]);
    }

    #[test]
    fn linsert_places_direction_before_pivot() {
        let (_, ops) = ops();
        let ctx = Context::background();
        assert_eq!(
            ops.linsert_after(&ctx, "l", "p".into(), "v".into()).args(),
            vec![t("l"), Arg::Token("AFTER"), t("p"), t("v")]
        );
    }

    #[test]
    fn lrange_and_ltrim() {
        let (recorder, ops) = ops();
        let ctx = Context::background();
        recorder.push(texts(&["x"]));
        recorder.push("OK");

        assert_eq!(
            ops.lrange(&ctx, "l", 0, -1).result().unwrap(),
            Some(vec!["x".to_string()])
        );
        assert_eq!(ops.ltrim(&ctx, "l", 1, -1).result().unwrap(), "OK");
        assert_eq!(recorder.calls()[1].0, "LTRIM");
    }

    #[test]
    fn every_command_pairs_with_its_reply() {
        let (recorder, ops) = ops();
        let ctx = Context::background();
        let r = &recorder;

        check_pairing(r, ops.lindex(&ctx, "l", -1), &["LINDEX", "l", "-1"], "z", "z".to_string());
        check_pairing(
            r,
            ops.linsert_before(&ctx, "l", t("p"), t("v")),
            &["LINSERT", "l", "BEFORE", "p", "v"],
            4i64,
            4,
        );
        check_pairing(
            r,
            ops.linsert_after(&ctx, "l", t("missing"), t("v")),
            &["LINSERT", "l", "AFTER", "missing", "v"],
            -1i64,
            -1,
        );
        check_pairing(r, ops.llen(&ctx, "l"), &["LLEN", "l"], 3i64, 3);
        check_pairing(
            r,
            ops.lmove(&ctx, "a", "b", Side::Right, Side::Left),
            &["LMOVE", "a", "b", "RIGHT", "LEFT"],
            "x",
            "x".to_string(),
        );
        check_pairing(r, ops.lpop(&ctx, "l"), &["LPOP", "l"], Reply::Nil, String::new());
        check_pairing(r, ops.lpop_n(&ctx, "l", 2), &["LPOP", "l", "2"], texts(&["a", "b"]), Some(owned(&["a", "b"])));
        check_pairing(r, ops.lpos(&ctx, "l", t("b")), &["LPOS", "l", "b"], 1i64, 1);
        check_pairing(
            r,
            ops.lpos_n(&ctx, "l", t("b"), 0),
            &["LPOS", "l", "b", "COUNT", "0"],
            vec![Reply::Integer(1), Reply::Integer(4)],
            Some(vec![1, 4]),
        );
        check_pairing(r, ops.lpush(&ctx, "l", &[t("a"), t("b")]), &["LPUSH", "l", "a", "b"], 2i64, 2);
        check_pairing(r, ops.lpush_x(&ctx, "l", &[t("a")]), &["LPUSHX", "l", "a"], 0i64, 0);
        check_pairing(r, ops.lrange(&ctx, "l", 0, -1), &["LRANGE", "l", "0", "-1"], texts(&["a"]), Some(owned(&["a"])));
        check_pairing(r, ops.lrem(&ctx, "l", -2, t("a")), &["LREM", "l", "-2", "a"], 2i64, 2);
        check_pairing(r, ops.lset(&ctx, "l", 0, t("v")), &["LSET", "l", "0", "v"], "OK", "OK".to_string());
        check_pairing(r, ops.ltrim(&ctx, "l", 1, -1), &["LTRIM", "l", "1", "-1"], "OK", "OK".to_string());
        check_pairing(r, ops.rpop(&ctx, "l"), &["RPOP", "l"], "z", "z".to_string());
        check_pairing(r, ops.rpop_n(&ctx, "l", 5), &["RPOP", "l", "5"], Reply::Nil, None);
        check_pairing(r, ops.rpop_lpush(&ctx, "a", "b"), &["RPOPLPUSH", "a", "b"], "z", "z".to_string());
        check_pairing(r, ops.rpush(&ctx, "l", &[Arg::Int(7)]), &["RPUSH", "l", "7"], 1i64, 1);
        check_pairing(r, ops.rpush_x(&ctx, "l", &[t("a")]), &["RPUSHX", "l", "a"], 0i64, 0);
    }
}
