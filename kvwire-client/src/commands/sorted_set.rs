//! Sorted set commands.
//!
//! Score and lexicographic bounds are passed through as [`Arg`] or `&str`
//! so callers can use the exclusive `(` prefix and `-inf`/`+inf`.

use std::sync::Arc;

use kvwire_common::{Arg, Context, ScoreMember, Transport};

use super::{text_args, with_texts, with_values, Dispatch};
use crate::command::{Cmd, Comparison, Conditional};

/// How `ZINTER`/`ZUNION` combine scores of the same member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Min,
    Max,
}

impl Aggregate {
    fn token(self) -> Arg {
        match self {
            Aggregate::Sum => Arg::Token("SUM"),
            Aggregate::Min => Arg::Token("MIN"),
            Aggregate::Max => Arg::Token("MAX"),
        }
    }
}

/// Options accepted by `ZADD`.
pub enum ZAddOptions {}

impl Conditional for ZAddOptions {}

impl Comparison for ZAddOptions {}

impl<T> Cmd<T, ZAddOptions> {
    /// Count changed elements instead of only added ones.
    pub fn ch(self) -> Self {
        self.option(2, [Arg::Token("CH")])
    }
}

/// Options accepted by `ZRANGE`.
pub enum ZRangeOptions {}

impl<T> Cmd<T, ZRangeOptions> {
    /// Treat start and stop as score bounds.
    pub fn by_score(self) -> Self {
        self.option(0, [Arg::Token("BYSCORE")])
    }

    /// Treat start and stop as lexicographic bounds.
    pub fn by_lex(self) -> Self {
        self.option(0, [Arg::Token("BYLEX")])
    }

    /// Reverse the ordering.
    pub fn rev(self) -> Self {
        self.option(1, [Arg::Token("REV")])
    }

    /// Return `count` elements after skipping `offset`. Requires a by-score
    /// or by-lex range.
    pub fn limit(self, offset: i64, count: i64) -> Self {
        self.option(2, [Arg::Token("LIMIT"), Arg::Int(offset), Arg::Int(count)])
    }
}

/// Options accepted by the `ZRANGEBY*` and `ZREVRANGEBY*` commands.
pub enum RangeByOptions {}

const WITHSCORES_RANK: u8 = 0;

impl<T> Cmd<T, RangeByOptions> {
    /// Return `count` elements after skipping `offset`.
    pub fn limit(self, offset: i64, count: i64) -> Self {
        self.option(1, [Arg::Token("LIMIT"), Arg::Int(offset), Arg::Int(count)])
    }
}

/// Options accepted by `ZINTER`, `ZUNION` and their `STORE` variants.
pub enum CombineOptions {}

impl<T> Cmd<T, CombineOptions> {
    /// Multiplication factor per input key, in key order.
    pub fn weights(self, weights: &[f64]) -> Self {
        let tokens = std::iter::once(Arg::Token("WEIGHTS"))
            .chain(weights.iter().map(|w| Arg::Float(*w)))
            .collect::<Vec<_>>();
        self.option(0, tokens)
    }

    pub fn aggregate(self, aggregate: Aggregate) -> Self {
        self.option(1, [Arg::Token("AGGREGATE"), aggregate.token()])
    }
}

pub trait SortedSetCommands: Send + Sync {
    /// Command: ZADD key [NX|XX] [GT|LT] [CH] score member [score member ...]
    /// Integer reply: the number of elements added to the sorted set.
    fn zadd(&self, ctx: &Context, key: &str, members: &[ScoreMember]) -> Cmd<i64, ZAddOptions>;

    /// Command: ZADD key [NX|XX] [GT|LT] [CH] INCR score member
    /// Bulk string reply: the new score of member, nil when the operation was aborted.
    fn zadd_incr(
        &self,
        ctx: &Context,
        key: &str,
        increment: f64,
        member: &str,
    ) -> Cmd<f64, ZAddOptions>;

    /// Command: ZCARD key
    /// Integer reply: the cardinality (number of elements) of the sorted set.
    fn zcard(&self, ctx: &Context, key: &str) -> Cmd<i64>;

    /// Command: ZCOUNT key min max
    /// Integer reply: the number of elements in the specified score range.
    fn zcount(&self, ctx: &Context, key: &str, min: &str, max: &str) -> Cmd<i64>;

    /// Command: ZDIFF numkeys key [key ...]
    /// Array reply: the result of the difference.
    fn zdiff(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>>;

    /// Command: ZDIFF numkeys key [key ...] WITHSCORES
    /// Array reply: the result of the difference with scores.
    fn zdiff_with_scores(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<ScoreMember>>>;

    /// Command: ZDIFFSTORE destination numkeys key [key ...]
    /// Integer reply: the number of elements in the resulting sorted set.
    fn zdiff_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> Cmd<i64>;

    /// Command: ZINCRBY key increment member
    /// Bulk string reply: the new score of member.
    fn zincr_by(&self, ctx: &Context, key: &str, increment: f64, member: &str) -> Cmd<f64>;

    /// Command: ZINTER numkeys key [key ...] [WEIGHTS weight ...] [AGGREGATE SUM|MIN|MAX]
    /// Array reply: the result of the intersection.
    fn zinter(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>, CombineOptions>;

    /// Command: ZINTER numkeys key [key ...] [WEIGHTS weight ...] [AGGREGATE SUM|MIN|MAX] WITHSCORES
    /// Array reply: the result of the intersection with scores.
    fn zinter_with_scores(
        &self,
        ctx: &Context,
        keys: &[&str],
    ) -> Cmd<Option<Vec<ScoreMember>>, CombineOptions>;

    /// Command: ZINTERSTORE destination numkeys key [key ...] [WEIGHTS weight ...] [AGGREGATE SUM|MIN|MAX]
    /// Integer reply: the number of elements in the resulting sorted set.
    fn zinter_store(
        &self,
        ctx: &Context,
        destination: &str,
        keys: &[&str],
    ) -> Cmd<i64, CombineOptions>;

    /// Command: ZLEXCOUNT key min max
    /// Integer reply: the number of elements in the specified lexicographic range.
    fn zlex_count(&self, ctx: &Context, key: &str, min: &str, max: &str) -> Cmd<i64>;

    /// Command: ZMSCORE key member [member ...]
    /// Array reply: list of scores or nil associated with the specified members.
    fn zmscore(&self, ctx: &Context, key: &str, members: &[&str]) -> Cmd<Option<Vec<f64>>>;

    /// Command: ZPOPMAX key
    /// Array reply: popped element and score.
    fn zpop_max(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<ScoreMember>>>;

    /// Command: ZPOPMAX key count
    /// Array reply: list of popped elements and scores.
    fn zpop_max_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<ScoreMember>>>;

    /// Command: ZPOPMIN key
    /// Array reply: popped element and score.
    fn zpop_min(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<ScoreMember>>>;

    /// Command: ZPOPMIN key count
    /// Array reply: list of popped elements and scores.
    fn zpop_min_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<ScoreMember>>>;

    /// Command: ZRANDMEMBER key
    /// Bulk string reply: the randomly selected element, or nil when key does not exist.
    fn zrand_member(&self, ctx: &Context, key: &str) -> Cmd<String>;

    /// Command: ZRANDMEMBER key count
    /// Array reply: the randomly selected elements.
    fn zrand_member_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>>;

    /// Command: ZRANDMEMBER key count WITHSCORES
    /// Array reply: the randomly selected elements with their scores.
    fn zrand_member_with_scores(
        &self,
        ctx: &Context,
        key: &str,
        count: i64,
    ) -> Cmd<Option<Vec<ScoreMember>>>;

    /// Command: ZRANGE key start stop [BYSCORE|BYLEX] [REV] [LIMIT offset count]
    /// Array reply: list of elements in the specified range.
    fn zrange(
        &self,
        ctx: &Context,
        key: &str,
        start: Arg,
        stop: Arg,
    ) -> Cmd<Option<Vec<String>>, ZRangeOptions>;

    /// Command: ZRANGE key start stop [BYSCORE|BYLEX] [REV] [LIMIT offset count] WITHSCORES
    /// Array reply: list of elements in the specified range with their scores.
    fn zrange_with_scores(
        &self,
        ctx: &Context,
        key: &str,
        start: Arg,
        stop: Arg,
    ) -> Cmd<Option<Vec<ScoreMember>>, ZRangeOptions>;

    /// Command: ZRANGEBYLEX key min max [LIMIT offset count]
    /// Array reply: list of elements in the specified lexicographic range.
    fn zrange_by_lex(
        &self,
        ctx: &Context,
        key: &str,
        min: &str,
        max: &str,
    ) -> Cmd<Option<Vec<String>>, RangeByOptions>;

    /// Command: ZRANGEBYSCORE key min max [LIMIT offset count]
    /// Array reply: list of elements in the specified score range.
    fn zrange_by_score(
        &self,
        ctx: &Context,
        key: &str,
        min: &str,
        max: &str,
    ) -> Cmd<Option<Vec<String>>, RangeByOptions>;

    /// Command: ZRANGEBYSCORE key min max WITHSCORES [LIMIT offset count]
    /// Array reply: list of elements in the specified score range with their scores.
    fn zrange_by_score_with_scores(
        &self,
        ctx: &Context,
        key: &str,
        min: &str,
        max: &str,
    ) -> Cmd<Option<Vec<ScoreMember>>, RangeByOptions>;

    /// Command: ZRANK key member
    /// Integer reply: the rank of member, 0 when decoding a nil.
    fn zrank(&self, ctx: &Context, key: &str, member: &str) -> Cmd<i64>;

    /// Command: ZREM key member [member ...]
    /// Integer reply: The number of members removed from the sorted set.
    fn zrem(&self, ctx: &Context, key: &str, members: &[Arg]) -> Cmd<i64>;

    /// Command: ZREMRANGEBYLEX key min max
    /// Integer reply: the number of elements removed.
    fn zrem_range_by_lex(&self, ctx: &Context, key: &str, min: &str, max: &str) -> Cmd<i64>;

    /// Command: ZREMRANGEBYRANK key start stop
    /// Integer reply: the number of elements removed.
    fn zrem_range_by_rank(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> Cmd<i64>;

    /// Command: ZREMRANGEBYSCORE key min max
    /// Integer reply: the number of elements removed.
    fn zrem_range_by_score(&self, ctx: &Context, key: &str, min: &str, max: &str) -> Cmd<i64>;

    /// Command: ZREVRANGE key start stop
    /// Array reply: list of elements in the specified range.
    fn zrev_range(
        &self,
        ctx: &Context,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Cmd<Option<Vec<String>>>;

    /// Command: ZREVRANGE key start stop WITHSCORES
    /// Array reply: list of elements in the specified range with their scores.
    fn zrev_range_with_scores(
        &self,
        ctx: &Context,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Cmd<Option<Vec<ScoreMember>>>;

    /// Command: ZREVRANGEBYLEX key max min [LIMIT offset count]
    /// Array reply: list of elements in the specified lexicographic range.
    fn zrev_range_by_lex(
        &self,
        ctx: &Context,
        key: &str,
        max: &str,
        min: &str,
    ) -> Cmd<Option<Vec<String>>, RangeByOptions>;

    /// Command: ZREVRANGEBYSCORE key max min [LIMIT offset count]
    /// Array reply: list of elements in the specified score range.
    fn zrev_range_by_score(
        &self,
        ctx: &Context,
        key: &str,
        max: &str,
        min: &str,
    ) -> Cmd<Option<Vec<String>>, RangeByOptions>;

    /// Command: ZREVRANK key member
    /// Integer reply: the rank of member, 0 when decoding a nil.
    fn zrev_rank(&self, ctx: &Context, key: &str, member: &str) -> Cmd<i64>;

    /// Command: ZSCORE key member
    /// Bulk string reply: the score of member.
    fn zscore(&self, ctx: &Context, key: &str, member: &str) -> Cmd<f64>;

    /// Command: ZUNION numkeys key [key ...] [WEIGHTS weight ...] [AGGREGATE SUM|MIN|MAX]
    /// Array reply: the result of the union.
    fn zunion(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>, CombineOptions>;

    /// Command: ZUNION numkeys key [key ...] [WEIGHTS weight ...] [AGGREGATE SUM|MIN|MAX] WITHSCORES
    /// Array reply: the result of the union with scores.
    fn zunion_with_scores(
        &self,
        ctx: &Context,
        keys: &[&str],
    ) -> Cmd<Option<Vec<ScoreMember>>, CombineOptions>;

    /// Command: ZUNIONSTORE destination numkeys key [key ...] [WEIGHTS weight ...] [AGGREGATE SUM|MIN|MAX]
    /// Integer reply: the number of elements in the resulting sorted set.
    fn zunion_store(
        &self,
        ctx: &Context,
        destination: &str,
        keys: &[&str],
    ) -> Cmd<i64, CombineOptions>;
}

/// Default sorted set commands.
pub struct SortedSetOps {
    dispatch: Dispatch,
}

impl SortedSetOps {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        SortedSetOps {
            dispatch: Dispatch::new(transport),
        }
    }

    /// `numkeys key [key ...]`, optionally led by a destination.
    fn numkeys<T, O>(
        &self,
        ctx: &Context,
        name: &'static str,
        destination: Option<&str>,
        keys: &[&str],
    ) -> Cmd<T, O> {
        let mut args = Vec::with_capacity(keys.len() + 2);
        if let Some(destination) = destination {
            args.push(Arg::from(destination));
        }
        args.push(Arg::from(keys.len()));
        args.extend(text_args(keys));
        self.dispatch.cmd(ctx, name, args)
    }

    fn bounds<T, O>(&self, ctx: &Context, name: &'static str, key: &str, a: &str, b: &str) -> Cmd<T, O> {
        self.dispatch.cmd(ctx, name, vec![key.into(), a.into(), b.into()])
    }
}

fn withscores() -> [Arg; 1] {
    [Arg::Token("WITHSCORES")]
}

impl SortedSetCommands for SortedSetOps {
    fn zadd(&self, ctx: &Context, key: &str, members: &[ScoreMember]) -> Cmd<i64, ZAddOptions> {
        let pairs = members
            .iter()
            .flat_map(|item| [Arg::Float(item.score), Arg::from(&item.member)]);
        self.dispatch.cmd(ctx, "ZADD", vec![key.into()]).trailing(pairs)
    }

    fn zadd_incr(
        &self,
        ctx: &Context,
        key: &str,
        increment: f64,
        member: &str,
    ) -> Cmd<f64, ZAddOptions> {
        self.dispatch.cmd(ctx, "ZADD", vec![key.into()]).trailing([
            Arg::Token("INCR"),
            Arg::Float(increment),
            Arg::from(member),
        ])
    }

    fn zcard(&self, ctx: &Context, key: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "ZCARD", vec![key.into()])
    }

    fn zcount(&self, ctx: &Context, key: &str, min: &str, max: &str) -> Cmd<i64> {
        self.bounds(ctx, "ZCOUNT", key, min, max)
    }

    fn zdiff(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>> {
        self.numkeys(ctx, "ZDIFF", None, keys)
    }

    fn zdiff_with_scores(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<ScoreMember>>> {
        self.numkeys(ctx, "ZDIFF", None, keys).trailing(withscores())
    }

    fn zdiff_store(&self, ctx: &Context, destination: &str, keys: &[&str]) -> Cmd<i64> {
        self.numkeys(ctx, "ZDIFFSTORE", Some(destination), keys)
    }

    fn zincr_by(&self, ctx: &Context, key: &str, increment: f64, member: &str) -> Cmd<f64> {
        self.dispatch.cmd(
            ctx,
            "ZINCRBY",
            vec![key.into(), increment.into(), member.into()],
        )
    }

    fn zinter(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>, CombineOptions> {
        self.numkeys(ctx, "ZINTER", None, keys)
    }

    fn zinter_with_scores(
        &self,
        ctx: &Context,
        keys: &[&str],
    ) -> Cmd<Option<Vec<ScoreMember>>, CombineOptions> {
        self.numkeys(ctx, "ZINTER", None, keys).trailing(withscores())
    }

    fn zinter_store(
        &self,
        ctx: &Context,
        destination: &str,
        keys: &[&str],
    ) -> Cmd<i64, CombineOptions> {
        self.numkeys(ctx, "ZINTERSTORE", Some(destination), keys)
    }

    fn zlex_count(&self, ctx: &Context, key: &str, min: &str, max: &str) -> Cmd<i64> {
        self.bounds(ctx, "ZLEXCOUNT", key, min, max)
    }

    fn zmscore(&self, ctx: &Context, key: &str, members: &[&str]) -> Cmd<Option<Vec<f64>>> {
        self.dispatch
            .cmd(ctx, "ZMSCORE", with_texts(vec![key.into()], members))
    }

    fn zpop_max(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<ScoreMember>>> {
        self.dispatch.cmd(ctx, "ZPOPMAX", vec![key.into()])
    }

    fn zpop_max_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<ScoreMember>>> {
        self.dispatch.cmd(ctx, "ZPOPMAX", vec![key.into(), count.into()])
    }

    fn zpop_min(&self, ctx: &Context, key: &str) -> Cmd<Option<Vec<ScoreMember>>> {
        self.dispatch.cmd(ctx, "ZPOPMIN", vec![key.into()])
    }

    fn zpop_min_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<ScoreMember>>> {
        self.dispatch.cmd(ctx, "ZPOPMIN", vec![key.into(), count.into()])
    }

    fn zrand_member(&self, ctx: &Context, key: &str) -> Cmd<String> {
        self.dispatch.cmd(ctx, "ZRANDMEMBER", vec![key.into()])
    }

    fn zrand_member_n(&self, ctx: &Context, key: &str, count: i64) -> Cmd<Option<Vec<String>>> {
        self.dispatch
            .cmd(ctx, "ZRANDMEMBER", vec![key.into(), count.into()])
    }

    fn zrand_member_with_scores(
        &self,
        ctx: &Context,
        key: &str,
        count: i64,
    ) -> Cmd<Option<Vec<ScoreMember>>> {
        self.dispatch
            .cmd(ctx, "ZRANDMEMBER", vec![key.into(), count.into()])
            .trailing(withscores())
    }

    fn zrange(
        &self,
        ctx: &Context,
        key: &str,
        start: Arg,
        stop: Arg,
    ) -> Cmd<Option<Vec<String>>, ZRangeOptions> {
        self.dispatch.cmd(ctx, "ZRANGE", vec![key.into(), start, stop])
    }

    fn zrange_with_scores(
        &self,
        ctx: &Context,
        key: &str,
        start: Arg,
        stop: Arg,
    ) -> Cmd<Option<Vec<ScoreMember>>, ZRangeOptions> {
        self.dispatch
            .cmd(ctx, "ZRANGE", vec![key.into(), start, stop])
            .trailing(withscores())
    }

    fn zrange_by_lex(
        &self,
        ctx: &Context,
        key: &str,
        min: &str,
        max: &str,
    ) -> Cmd<Option<Vec<String>>, RangeByOptions> {
        self.bounds(ctx, "ZRANGEBYLEX", key, min, max)
    }

    fn zrange_by_score(
        &self,
        ctx: &Context,
        key: &str,
        min: &str,
        max: &str,
    ) -> Cmd<Option<Vec<String>>, RangeByOptions> {
        self.bounds(ctx, "ZRANGEBYSCORE", key, min, max)
    }

    fn zrange_by_score_with_scores(
        &self,
        ctx: &Context,
        key: &str,
        min: &str,
        max: &str,
    ) -> Cmd<Option<Vec<ScoreMember>>, RangeByOptions> {
        self.bounds(ctx, "ZRANGEBYSCORE", key, min, max)
            .option(WITHSCORES_RANK, withscores())
    }

    fn zrank(&self, ctx: &Context, key: &str, member: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "ZRANK", vec![key.into(), member.into()])
    }

    fn zrem(&self, ctx: &Context, key: &str, members: &[Arg]) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "ZREM", with_values(vec![key.into()], members))
    }

    fn zrem_range_by_lex(&self, ctx: &Context, key: &str, min: &str, max: &str) -> Cmd<i64> {
        self.bounds(ctx, "ZREMRANGEBYLEX", key, min, max)
    }

    fn zrem_range_by_rank(&self, ctx: &Context, key: &str, start: i64, stop: i64) -> Cmd<i64> {
        self.dispatch.cmd(
            ctx,
            "ZREMRANGEBYRANK",
            vec![key.into(), start.into(), stop.into()],
        )
    }

    fn zrem_range_by_score(&self, ctx: &Context, key: &str, min: &str, max: &str) -> Cmd<i64> {
        self.bounds(ctx, "ZREMRANGEBYSCORE", key, min, max)
    }

    fn zrev_range(
        &self,
        ctx: &Context,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Cmd<Option<Vec<String>>> {
        self.dispatch
            .cmd(ctx, "ZREVRANGE", vec![key.into(), start.into(), stop.into()])
    }

    fn zrev_range_with_scores(
        &self,
        ctx: &Context,
        key: &str,
        start: i64,
        stop: i64,
    ) -> Cmd<Option<Vec<ScoreMember>>> {
        self.dispatch
            .cmd(ctx, "ZREVRANGE", vec![key.into(), start.into(), stop.into()])
            .trailing(withscores())
    }

    fn zrev_range_by_lex(
        &self,
        ctx: &Context,
        key: &str,
        max: &str,
        min: &str,
    ) -> Cmd<Option<Vec<String>>, RangeByOptions> {
        self.bounds(ctx, "ZREVRANGEBYLEX", key, max, min)
    }

    fn zrev_range_by_score(
        &self,
        ctx: &Context,
        key: &str,
        max: &str,
        min: &str,
    ) -> Cmd<Option<Vec<String>>, RangeByOptions> {
        self.bounds(ctx, "ZREVRANGEBYSCORE", key, max, min)
    }

    fn zrev_rank(&self, ctx: &Context, key: &str, member: &str) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "ZREVRANK", vec![key.into(), member.into()])
    }

    fn zscore(&self, ctx: &Context, key: &str, member: &str) -> Cmd<f64> {
        self.dispatch.cmd(ctx, "ZSCORE", vec![key.into(), member.into()])
    }

    fn zunion(&self, ctx: &Context, keys: &[&str]) -> Cmd<Option<Vec<String>>, CombineOptions> {
        self.numkeys(ctx, "ZUNION", None, keys)
    }

    fn zunion_with_scores(
        &self,
        ctx: &Context,
        keys: &[&str],
    ) -> Cmd<Option<Vec<ScoreMember>>, CombineOptions> {
        self.numkeys(ctx, "ZUNION", None, keys).trailing(withscores())
    }

    fn zunion_store(
        &self,
        ctx: &Context,
        destination: &str,
        keys: &[&str],
    ) -> Cmd<i64, CombineOptions> {
        self.numkeys(ctx, "ZUNIONSTORE", Some(destination), keys)
    }
}
