//! In-memory transport for unit tests: records every call and replays
//! queued replies in order.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use kvwire_common::{Arg, Context, FromReply, Reply, Transport, TransportError};

use crate::command::Cmd;

type Call = (String, Vec<Arg>);

#[derive(Default)]
pub(crate) struct Recorder {
    calls: Mutex<Vec<Call>>,
    replies: Mutex<VecDeque<Result<Reply, TransportError>>>,
}

impl Recorder {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Recorder::default())
    }

    pub(crate) fn transport(self: &Arc<Self>) -> Arc<dyn Transport> {
        self.clone()
    }

    pub(crate) fn push(&self, reply: impl Into<Reply>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub(crate) fn fail(&self, err: TransportError) {
        self.replies.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for Recorder {
    fn exec(&self, _ctx: &Context, command: &str, args: &[Arg]) -> Result<Reply, TransportError> {
        self.calls
            .lock()
            .unwrap()
            .push((command.to_string(), args.to_vec()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Reply::Nil))
    }
}

/// Text list reply.
pub(crate) fn texts(items: &[&str]) -> Reply {
    Reply::List(items.iter().map(|s| Reply::from(*s)).collect())
}

/// Shorthand for a text argument.
pub(crate) fn t(s: &str) -> Arg {
    Arg::from(s)
}

/// Owned copies of `items`.
pub(crate) fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Checks the rendered wire form of `cmd` (name first), then answers it
/// with `reply` and checks the decoded value. Exactly one call must reach
/// the transport.
pub(crate) fn check_pairing<T, O>(
    recorder: &Recorder,
    cmd: Cmd<T, O>,
    wire: &[&str],
    reply: impl Into<Reply>,
    expected: T,
) where
    T: FromReply + PartialEq + fmt::Debug,
{
    let rendered: Vec<String> = std::iter::once(cmd.name().to_string())
        .chain(cmd.args().iter().map(|arg| arg.render().into_owned()))
        .collect();
    assert_eq!(rendered, wire);

    let before = recorder.calls().len();
    recorder.push(reply);
    assert_eq!(cmd.result().unwrap(), expected, "{}", wire[0]);
    assert_eq!(recorder.calls().len(), before + 1, "{}", wire[0]);
}
