// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bulk-listing DTOs.

use serde::{Deserialize, Serialize};

use crate::{BlockInfo, ConnectionInfo};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListBlocksResponse {
    pub blocks: Vec<BlockInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConnectionsResponse {
    pub connections: Vec<ConnectionInfo>,
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
