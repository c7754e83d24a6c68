//! Bitmap commands.

use std::sync::Arc;

use kvwire_common::{Arg, Context, Transport};

use super::{with_texts, Dispatch};
use crate::command::Cmd;

/// Index unit for bitmap ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitUnit {
    Byte,
    Bit,
}

impl BitUnit {
    fn token(self) -> Arg {
        match self {
            BitUnit::Byte => Arg::Token("BYTE"),
            BitUnit::Bit => Arg::Token("BIT"),
        }
    }
}

/// Options accepted by `BITCOUNT`.
pub enum BitCountOptions {}

impl<T> Cmd<T, BitCountOptions> {
    /// Count only within `start..=end`.
    pub fn range(self, start: i64, end: i64) -> Self {
        self.option(0, [Arg::Int(start), Arg::Int(end)])
    }

    /// Interpret the range in bytes or bits. Requires `range`.
    pub fn unit(self, unit: BitUnit) -> Self {
        self.option(1, [unit.token()])
    }
}

/// Options accepted by `BITPOS`.
pub enum BitPosOptions {}

impl<T> Cmd<T, BitPosOptions> {
    /// Start searching at `start`.
    pub fn start(self, start: i64) -> Self {
        self.option(0, [Arg::Int(start)])
    }

    /// Search only within `start..=end`.
    pub fn range(self, start: i64, end: i64) -> Self {
        self.option(0, [Arg::Int(start), Arg::Int(end)])
    }

    /// Interpret the range in bytes or bits. Requires `range`.
    pub fn unit(self, unit: BitUnit) -> Self {
        self.option(1, [unit.token()])
    }
}

pub trait BitmapCommands: Send + Sync {
    /// Command: BITCOUNT key [start end [BYTE|BIT]]
    /// Integer reply: The number of bits set to 1.
    fn bit_count(&self, ctx: &Context, key: &str) -> Cmd<i64, BitCountOptions>;

    /// Command: BITOP AND destkey srckey1 srckey2 ... srckeyN
    /// Integer reply: The size of the string stored in the destination key.
    fn bit_op_and(&self, ctx: &Context, dest_key: &str, keys: &[&str]) -> Cmd<i64>;

    /// Command: BITOP OR destkey srckey1 srckey2 ... srckeyN
    /// Integer reply: The size of the string stored in the destination key.
    fn bit_op_or(&self, ctx: &Context, dest_key: &str, keys: &[&str]) -> Cmd<i64>;

    /// Command: BITOP XOR destkey srckey1 srckey2 ... srckeyN
    /// Integer reply: The size of the string stored in the destination key.
    fn bit_op_xor(&self, ctx: &Context, dest_key: &str, keys: &[&str]) -> Cmd<i64>;

    /// Command: BITOP NOT destkey srckey
    /// Integer reply: The size of the string stored in the destination key.
    fn bit_op_not(&self, ctx: &Context, dest_key: &str, key: &str) -> Cmd<i64>;

    /// Command: BITPOS key bit [start [end [BYTE|BIT]]]
    /// Integer reply: The position of the first bit set to 1 or 0 according to the request.
    fn bit_pos(&self, ctx: &Context, key: &str, bit: i64) -> Cmd<i64, BitPosOptions>;

    /// Command: GETBIT key offset
    /// Integer reply: the bit value stored at offset.
    fn get_bit(&self, ctx: &Context, key: &str, offset: i64) -> Cmd<i64>;

    /// Command: SETBIT key offset value
    /// Integer reply: the original bit value stored at offset.
    fn set_bit(&self, ctx: &Context, key: &str, offset: i64, value: i64) -> Cmd<i64>;
}

/// Default bitmap commands.
pub struct BitmapOps {
    dispatch: Dispatch,
}

impl BitmapOps {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        BitmapOps {
            dispatch: Dispatch::new(transport),
        }
    }

    fn bit_op(&self, ctx: &Context, op: &'static str, dest_key: &str, keys: &[&str]) -> Cmd<i64> {
        let args = with_texts(vec![Arg::Token(op), dest_key.into()], keys);
        self.dispatch.cmd(ctx, "BITOP", args)
    }
}

impl BitmapCommands for BitmapOps {
    fn bit_count(&self, ctx: &Context, key: &str) -> Cmd<i64, BitCountOptions> {
        self.dispatch.cmd(ctx, "BITCOUNT", vec![key.into()])
    }

    fn bit_op_and(&self, ctx: &Context, dest_key: &str, keys: &[&str]) -> Cmd<i64> {
        self.bit_op(ctx, "AND", dest_key, keys)
    }

    fn bit_op_or(&self, ctx: &Context, dest_key: &str, keys: &[&str]) -> Cmd<i64> {
        self.bit_op(ctx, "OR", dest_key, keys)
    }

    fn bit_op_xor(&self, ctx: &Context, dest_key: &str, keys: &[&str]) -> Cmd<i64> {
        self.bit_op(ctx, "XOR", dest_key, keys)
    }

    fn bit_op_not(&self, ctx: &Context, dest_key: &str, key: &str) -> Cmd<i64> {
        self.bit_op(ctx, "NOT", dest_key, &[key])
    }

    fn bit_pos(&self, ctx: &Context, key: &str, bit: i64) -> Cmd<i64, BitPosOptions> {
        self.dispatch.cmd(ctx, "BITPOS", vec![key.into(), bit.into()])
    }

    fn get_bit(&self, ctx: &Context, key: &str, offset: i64) -> Cmd<i64> {
        self.dispatch.cmd(ctx, "GETBIT", vec![key.into(), offset.into()])
    }

    fn set_bit(&self, ctx: &Context, key: &str, offset: i64, value: i64) -> Cmd<i64> {
        self.dispatch
            .cmd(ctx, "SETBIT", vec![key.into(), offset.into(), value.into()])
    }
}
