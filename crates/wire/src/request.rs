// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Inputs to the block-manager API's `Create`/`Connect` operations
//! (spec.md §6.2). Unlike [`crate::BlockInfo`]/[`crate::ConnectionInfo`],
//! which snapshot an existing record, these carry the caller-supplied
//! fields that may be partially absent (an empty/omitted `id` asks the
//! manager to generate one; an omitted `rule`/`position` takes the
//! manager's default).

use serde::{Deserialize, Serialize};
use streamtools_core::Position;

/// Caller-supplied fields for `BlockManager::create`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateBlockRequest {
    /// Empty or absent asks the manager to generate a fresh id.
    #[serde(default)]
    pub id: String,
    pub kind: String,
    pub rule: Option<serde_json::Value>,
    pub position: Option<Position>,
}

/// Caller-supplied fields for `BlockManager::connect`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateConnectionRequest {
    #[serde(default)]
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    pub to_route: String,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
