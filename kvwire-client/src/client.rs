//! # Client Composition Root
//!
//! Purpose: Wire one implementation per command family over a shared
//! transport, and let callers wrap any family with their own decorator.
//!
//! ## Design Principles
//! 1. **Facade Pattern**: `Client` hides which implementation serves a family.
//! 2. **Decorator Pattern**: A decorator receives the current family and
//!    returns its replacement; registering several wraps them in order.
//! 3. **Dependency Injection**: The transport is supplied by the caller; the
//!    client never opens sockets itself.

use std::sync::Arc;

use kvwire_common::Transport;
use tracing::debug;

use crate::commands::{
    BitmapCommands, BitmapOps, HashCommands, HashOps, KeyCommands, KeyOps, ListCommands, ListOps,
    SetCommands, SetOps, SortedSetCommands, SortedSetOps, StringCommands, StringOps,
};

/// Typed command client.
pub struct Client {
    strings: Box<dyn StringCommands>,
    bitmaps: Box<dyn BitmapCommands>,
    hashes: Box<dyn HashCommands>,
    lists: Box<dyn ListCommands>,
    sets: Box<dyn SetCommands>,
    sorted_sets: Box<dyn SortedSetCommands>,
    keys: Box<dyn KeyCommands>,
}

impl Client {
    /// Creates a client with the default implementation for every family.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ClientBuilder::new(transport).build()
    }

    /// Starts a builder for registering family decorators.
    pub fn builder(transport: Arc<dyn Transport>) -> ClientBuilder {
        ClientBuilder::new(transport)
    }

    pub fn strings(&self) -> &dyn StringCommands {
        self.strings.as_ref()
    }

    pub fn bitmaps(&self) -> &dyn BitmapCommands {
        self.bitmaps.as_ref()
    }

    pub fn hashes(&self) -> &dyn HashCommands {
        self.hashes.as_ref()
    }

    pub fn lists(&self) -> &dyn ListCommands {
        self.lists.as_ref()
    }

    pub fn sets(&self) -> &dyn SetCommands {
        self.sets.as_ref()
    }

    pub fn sorted_sets(&self) -> &dyn SortedSetCommands {
        self.sorted_sets.as_ref()
    }

    pub fn keys(&self) -> &dyn KeyCommands {
        self.keys.as_ref()
    }
}

/// Builder for [`Client`].
///
/// Each `decorate_*` call wraps whatever the family currently is, so the
/// last registered decorator is the outermost.
pub struct ClientBuilder {
    strings: Box<dyn StringCommands>,
    bitmaps: Box<dyn BitmapCommands>,
    hashes: Box<dyn HashCommands>,
    lists: Box<dyn ListCommands>,
    sets: Box<dyn SetCommands>,
    sorted_sets: Box<dyn SortedSetCommands>,
    keys: Box<dyn KeyCommands>,
    decorated: Vec<&'static str>,
}

impl ClientBuilder {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        ClientBuilder {
            strings: Box::new(StringOps::new(Arc::clone(&transport))),
            bitmaps: Box::new(BitmapOps::new(Arc::clone(&transport))),
            hashes: Box::new(HashOps::new(Arc::clone(&transport))),
            lists: Box::new(ListOps::new(Arc::clone(&transport))),
            sets: Box::new(SetOps::new(Arc::clone(&transport))),
            sorted_sets: Box::new(SortedSetOps::new(Arc::clone(&transport))),
            keys: Box::new(KeyOps::new(transport)),
            decorated: Vec::new(),
        }
    }

    pub fn decorate_strings<F>(mut self, decorator: F) -> Self
    where
        F: FnOnce(Box<dyn StringCommands>) -> Box<dyn StringCommands>,
    {
        self.strings = decorator(self.strings);
        self.decorated.push("strings");
        self
    }

    pub fn decorate_bitmaps<F>(mut self, decorator: F) -> Self
    where
        F: FnOnce(Box<dyn BitmapCommands>) -> Box<dyn BitmapCommands>,
    {
        self.bitmaps = decorator(self.bitmaps);
        self.decorated.push("bitmaps");
        self
    }

    pub fn decorate_hashes<F>(mut self, decorator: F) -> Self
    where
        F: FnOnce(Box<dyn HashCommands>) -> Box<dyn HashCommands>,
    {
        self.hashes = decorator(self.hashes);
        self.decorated.push("hashes");
        self
    }

    pub fn decorate_lists<F>(mut self, decorator: F) -> Self
    where
        F: FnOnce(Box<dyn ListCommands>) -> Box<dyn ListCommands>,
    {
        self.lists = decorator(self.lists);
        self.decorated.push("lists");
        self
    }

    pub fn decorate_sets<F>(mut self, decorator: F) -> Self
    where
        F: FnOnce(Box<dyn SetCommands>) -> Box<dyn SetCommands>,
    {
        self.sets = decorator(self.sets);
        self.decorated.push("sets");
        self
    }

    pub fn decorate_sorted_sets<F>(mut self, decorator: F) -> Self
    where
        F: FnOnce(Box<dyn SortedSetCommands>) -> Box<dyn SortedSetCommands>,
    {
        self.sorted_sets = decorator(self.sorted_sets);
        self.decorated.push("sorted_sets");
        self
    }

    pub fn decorate_keys<F>(mut self, decorator: F) -> Self
    where
        F: FnOnce(Box<dyn KeyCommands>) -> Box<dyn KeyCommands>,
    {
        self.keys = decorator(self.keys);
        self.decorated.push("keys");
        self
    }

    pub fn build(self) -> Client {
        debug!(decorated = ?self.decorated, "client built");
        Client {
            strings: self.strings,
            bitmaps: self.bitmaps,
            hashes: self.hashes,
            lists: self.lists,
            sets: self.sets,
            sorted_sets: self.sorted_sets,
            keys: self.keys,
        }
    }
}
