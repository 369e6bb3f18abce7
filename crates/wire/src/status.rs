// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Status-ping DTOs for `BlockManager::status_blocks`.

use serde::{Deserialize, Serialize};
use streamtools_core::BlockId;

/// The outcome of pinging a single block's query channel with a
/// `status` query during `StatusBlocks` (spec.md §4.3, grounded on
/// `blockmanager.go`'s per-block 5-second ping timeout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    Ok,
    TimedOut,
}

/// One block's ping outcome: the literal reply value (or the string
/// `"TIMEOUT"`) alongside the coarse [`BlockStatus`] a caller can
/// branch on without inspecting `reply`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    pub id: BlockId,
    pub status: BlockStatus,
    pub reply: serde_json::Value,
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
