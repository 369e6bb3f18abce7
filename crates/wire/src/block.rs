// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Block-facing DTOs: what `BlockManager::list_blocks`/`get_block`
//! hand back, and what a plug-in kind declares about itself.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use streamtools_core::{BlockId, Position};

/// A snapshot of a block record, with channels stripped out.
///
/// This is the management-API shape (spec.md §6.2); the runtime-side
/// `BlockRecord` that actually owns `BlockChans` lives in
/// `streamtools-runtime` and is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub id: BlockId,
    pub kind: String,
    pub rule: serde_json::Value,
    pub position: Position,
}

/// What a plug-in kind declares about its own shape during library
/// startup (`Setup` called once against a throwaway instance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDef {
    pub kind: String,
    pub in_routes: BTreeSet<String>,
    pub query_routes: BTreeSet<String>,
    pub out_routes: BTreeSet<String>,
}

impl BlockDef {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            in_routes: BTreeSet::new(),
            query_routes: BTreeSet::new(),
            out_routes: BTreeSet::new(),
        }
    }

    pub fn declares_in_route(&self, route: &str) -> bool {
        self.in_routes.contains(route)
    }

    pub fn declares_query_route(&self, route: &str) -> bool {
        self.query_routes.contains(route)
    }
}

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;
