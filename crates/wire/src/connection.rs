// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection-facing DTOs.

use serde::{Deserialize, Serialize};
use streamtools_core::{BlockId, ConnectionId};

/// A snapshot of a connection record, with channels stripped out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    pub id: ConnectionId,
    pub from_id: BlockId,
    pub to_id: BlockId,
    pub to_route: String,
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
