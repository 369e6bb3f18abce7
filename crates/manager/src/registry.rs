// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The plug-in library: a process-global `kind -> factory` mapping
//! (spec.md §4.5), grounded on `library.Blocks`/`library.Start()` in
//! `st/library/library.go`. Built once at startup by instantiating a
//! throwaway of every registered kind and capturing its [`BlockDef`];
//! definitions are read-only afterwards.

use std::collections::HashMap;

use streamtools_runtime::{declared_block_def, Block};
use streamtools_wire::BlockDef;

/// A zero-argument constructor for a plug-in kind.
pub type BlockFactory = fn() -> Box<dyn Block>;

/// Registry of block kinds known to a running manager.
///
/// Cloning a [`BlockLibrary`] is cheap (factories are function
/// pointers, defs are small), which lets `BlockManager` keep its own
/// copy without wrapping the library itself in a mutex — it is
/// immutable after construction, exactly like the original's
/// `library.Blocks` map once `library.Start()` has run.
#[derive(Clone, Default)]
pub struct BlockLibrary {
    factories: HashMap<&'static str, BlockFactory>,
    defs: HashMap<&'static str, BlockDef>,
}

impl BlockLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plug-in kind, instantiating a throwaway to capture
    /// its declared [`BlockDef`]. Panics if `kind` is already
    /// registered — a duplicate registration is a startup-time
    /// programming error, not a runtime condition callers recover from.
    pub fn register(&mut self, kind: &'static str, factory: BlockFactory) {
        assert!(
            !self.factories.contains_key(kind),
            "block kind {kind:?} registered twice"
        );
        let mut throwaway = factory();
        let def = declared_block_def(kind, throwaway.as_mut());
        self.factories.insert(kind, factory);
        self.defs.insert(kind, def);
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    pub fn def(&self, kind: &str) -> Option<&BlockDef> {
        self.defs.get(kind)
    }

    pub fn defs(&self) -> impl Iterator<Item = &BlockDef> {
        self.defs.values()
    }

    /// Instantiates a fresh, ready-to-spawn plug-in of `kind`.
    pub fn create(&self, kind: &str) -> Option<Box<dyn Block>> {
        self.factories.get(kind).map(|factory| factory())
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
