// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! streamtools-runtime: the block multiplexer and connection routine
//! (spec.md §4.1, §4.2) — the two task shapes every running block or
//! edge in the graph reduces to.

pub mod block;
pub mod connection;

pub use block::{
    declared_block_def, spawn_block, AddChanMsg, Block, BlockBuilder, BlockChans, QueryMsg,
    RunHandles, BROADCAST_BUFFER, IN_ROUTE_BUFFER, QUERY_ROUTE_BUFFER,
};
pub use connection::{spawn_connection, ConnectionChans, ConnectionQuery};
