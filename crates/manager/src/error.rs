// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error kinds surfaced by [`crate::BlockManager`] operations
//! (spec.md §7), grounded on `ExecuteError`/`RuntimeError` in the
//! teacher's `daemon` crate: one `thiserror` enum, `#[error("...")]`
//! per variant, no blanket "other" catch-all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: id {0} already in use")]
    Conflict(String),
    #[error("timeout waiting for {0}")]
    Timeout(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
