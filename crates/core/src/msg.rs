// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The message and position types that flow between blocks.

use serde::{Deserialize, Serialize};

/// A single message traveling between blocks.
///
/// `route` selects which inbound port of the destination receives
/// `payload`; it is cleared to `""` by the block multiplexer when
/// broadcasting to fan-out targets (spec.md §4.1), since a fan-out
/// target picks its own inbound route when it registers the channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Msg {
    pub payload: serde_json::Value,
    pub route: String,
}

impl Msg {
    pub fn new(route: impl Into<String>, payload: serde_json::Value) -> Self {
        Self { route: route.into(), payload }
    }
}

/// Opaque UI metadata attached to a block. The runtime never inspects
/// this beyond storing and returning it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[cfg(test)]
#[path = "msg_tests.rs"]
mod tests;
