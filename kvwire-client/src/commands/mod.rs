//! # Command Families
//!
//! One object-safe trait per data-type family, each with a default
//! implementation that only assembles arguments and picks the reply type.
//! Traits are object-safe so the client can swap any family for a decorator.

mod bitmap;
mod hash;
mod key;
mod list;
mod set;
mod sorted_set;
mod string;

use std::sync::Arc;

use kvwire_common::{Arg, Context, Transport};

use crate::command::Cmd;

pub use bitmap::{BitCountOptions, BitPosOptions, BitUnit, BitmapCommands, BitmapOps};
pub use hash::{HashCommands, HashOps};
pub use key::{ExpireOptions, KeyCommands, KeyOps};
pub use list::{LPosOptions, ListCommands, ListOps, Side};
pub use set::{SetCommands, SetOps};
pub use sorted_set::{
    Aggregate, CombineOptions, RangeByOptions, SortedSetCommands, SortedSetOps, ZAddOptions,
    ZRangeOptions,
};
pub use string::{GetExOptions, SetOptions, StringCommands, StringOps};

/// Shared handle every default family uses to mint builders.
#[derive(Clone)]
pub(crate) struct Dispatch {
    transport: Arc<dyn Transport>,
}

impl Dispatch {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Dispatch { transport }
    }

    pub(crate) fn cmd<T, O>(&self, ctx: &Context, name: &'static str, args: Vec<Arg>) -> Cmd<T, O> {
        Cmd::new(Arc::clone(&self.transport), ctx.clone(), name, args)
    }
}

/// Text arguments for each key, in order.
pub(crate) fn text_args<'a>(items: &'a [&'a str]) -> impl Iterator<Item = Arg> + 'a {
    items.iter().map(|item| Arg::from(*item))
}

/// `head` followed by one text argument per item.
pub(crate) fn with_texts(head: Vec<Arg>, items: &[&str]) -> Vec<Arg> {
    let mut args = head;
    args.extend(text_args(items));
    args
}

/// `head` followed by the given values.
pub(crate) fn with_values(head: Vec<Arg>, values: &[Arg]) -> Vec<Arg> {
    let mut args = head;
    args.extend_from_slice(values);
    args
}
