//! # Command Builder
//!
//! Purpose: Hold one pending command (name, arguments, options, context) and
//! execute it exactly once against the transport.
//!
//! ## Design Principles
//! 1. **Builder Pattern**: Family methods return a `Cmd`; nothing is sent
//!    until the terminal `result()` call.
//! 2. **Static Reply Pairing**: The output type `T` picks the coercer, so a
//!    command cannot be decoded with the wrong shape at runtime.
//! 3. **Typed Option Sets**: The marker `O` names which fluent options a
//!    command accepts; shared options are blanket impls over marker traits.
//! 4. **Order-Independent Options**: Every option token carries a rank; the
//!    wire order is `positional ++ options by rank ++ trailing`, whatever
//!    order the caller applied them in.
//!
//! ## Argument Layout
//!
//! ```text
//! ZADD  key  NX  GT  CH  1.5 alice 2 bob
//!       |    |   |   |   |
//!       |    |   |   |   +-- trailing (score/member pairs)
//!       |    +---+---+------ options, sorted by rank (0, 1, 2)
//!       +------------------- positional
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use kvwire_common::{coerce, Arg, Context, FromReply, Transport, WireResult};
use tracing::{debug, trace};

/// A pending command whose reply decodes into `T`.
#[must_use = "commands do nothing until `result()` is called"]
pub struct Cmd<T, O = NoOptions> {
    transport: Arc<dyn Transport>,
    ctx: Context,
    name: &'static str,
    positional: Vec<Arg>,
    options: Vec<(u8, Arg)>,
    trailing: Vec<Arg>,
    _marker: PhantomData<fn() -> (T, O)>,
}

impl<T, O> Cmd<T, O> {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        ctx: Context,
        name: &'static str,
        positional: Vec<Arg>,
    ) -> Self {
        Cmd {
            transport,
            ctx,
            name,
            positional,
            options: Vec::new(),
            trailing: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Appends arguments that always follow every option.
    pub(crate) fn trailing<I>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = Arg>,
    {
        self.trailing.extend(args);
        self
    }

    /// Records one option occupying the given rank.
    pub(crate) fn option<I>(mut self, rank: u8, tokens: I) -> Self
    where
        I: IntoIterator<Item = Arg>,
    {
        self.options.extend(tokens.into_iter().map(|arg| (rank, arg)));
        self
    }

    /// Command name as sent on the wire.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Context captured when the command was built.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Arguments in wire order, excluding the command name.
    pub fn args(&self) -> Vec<Arg> {
        let mut options = self.options.clone();
        options.sort_by_key(|(rank, _)| *rank);

        let mut args =
            Vec::with_capacity(self.positional.len() + options.len() + self.trailing.len());
        args.extend(self.positional.iter().cloned());
        args.extend(options.into_iter().map(|(_, arg)| arg));
        args.extend(self.trailing.iter().cloned());
        args
    }
}

impl<T: FromReply, O> Cmd<T, O> {
    /// Executes the command and decodes the reply.
    pub fn result(self) -> WireResult<T> {
        let args = self.args();
        trace!(command = self.name, args = args.len(), "executing command");
        let reply = self.transport.exec(&self.ctx, self.name, &args);
        coerce::<T>(reply).map_err(|err| {
            debug!(command = self.name, error = %err, "command failed");
            err
        })
    }
}

impl<T, O> fmt::Debug for Cmd<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmd")
            .field("name", &self.name)
            .field("args", &self.args())
            .finish()
    }
}

/// Marker for commands without fluent options.
pub enum NoOptions {}

/// Option sets accepting `NX | XX`.
pub trait Conditional {
    const CONDITION_RANK: u8 = 0;
}

/// Option sets accepting `GT | LT`.
pub trait Comparison {
    const COMPARISON_RANK: u8 = 1;
}

/// Option sets accepting `EX | PX | EXAT | PXAT`.
pub trait Expiry {
    const EXPIRY_RANK: u8 = 0;
}

impl<T, O: Conditional> Cmd<T, O> {
    /// Only act when the target does not exist yet.
    pub fn nx(self) -> Self {
        self.option(O::CONDITION_RANK, [Arg::Token("NX")])
    }

    /// Only act when the target already exists.
    pub fn xx(self) -> Self {
        self.option(O::CONDITION_RANK, [Arg::Token("XX")])
    }
}

impl<T, O: Comparison> Cmd<T, O> {
    /// Only act when the new value is greater than the current one.
    pub fn gt(self) -> Self {
        self.option(O::COMPARISON_RANK, [Arg::Token("GT")])
    }

    /// Only act when the new value is less than the current one.
    pub fn lt(self) -> Self {
        self.option(O::COMPARISON_RANK, [Arg::Token("LT")])
    }
}

impl<T, O: Expiry> Cmd<T, O> {
    /// Expire after `seconds`.
    pub fn ex(self, seconds: i64) -> Self {
        self.option(O::EXPIRY_RANK, [Arg::Token("EX"), Arg::Int(seconds)])
    }

    /// Expire after `milliseconds`.
    pub fn px(self, milliseconds: i64) -> Self {
        self.option(O::EXPIRY_RANK, [Arg::Token("PX"), Arg::Int(milliseconds)])
    }

    /// Expire at a unix time in seconds.
    pub fn exat(self, timestamp: i64) -> Self {
        self.option(O::EXPIRY_RANK, [Arg::Token("EXAT"), Arg::Int(timestamp)])
    }

    /// Expire at a unix time in milliseconds.
    pub fn pxat(self, timestamp: i64) -> Self {
        self.option(O::EXPIRY_RANK, [Arg::Token("PXAT"), Arg::Int(timestamp)])
    }
}
