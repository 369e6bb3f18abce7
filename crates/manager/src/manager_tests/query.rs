// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::support::{block_req, manager};
use crate::error::ManagerError;

#[tokio::test]
async fn query_returns_the_blocks_answer() {
    let mgr = manager();
    mgr.create(Some(block_req("c1", streamtools_blocks::count::KIND))).await.unwrap();
    mgr.send("c1", "in", serde_json::json!(1)).await.unwrap();
    mgr.send("c1", "in", serde_json::json!(1)).await.unwrap();

    // `send` only enqueues; give the block a moment to process before
    // asserting on its state via `query`.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let reply = mgr.query("c1", "count").await.unwrap();
    assert_eq!(reply, serde_json::json!({"count": 2}));
}

#[tokio::test]
async fn query_against_an_unknown_route_reports_the_blocks_error_shape() {
    let mgr = manager();
    mgr.create(Some(block_req("b1", streamtools_blocks::identity::KIND))).await.unwrap();
    let reply = mgr.query("b1", "no-such-route").await.unwrap();
    assert_eq!(reply, serde_json::json!({"error": "unknown route"}));
}

#[tokio::test]
async fn query_against_an_unknown_block_is_not_found() {
    let mgr = manager();
    let err = mgr.query("nope", "ping").await.unwrap_err();
    assert!(matches!(err, ManagerError::NotFound(_)));
}

/// spec.md §4.3/§9: a query against a block whose route is declared
/// but never answered (the synthetic stalled block) must time out
/// rather than hang the caller forever.
#[tokio::test]
async fn query_against_a_stalled_block_times_out() {
    let mgr = manager();
    mgr.create(Some(block_req("s1", streamtools_blocks::test_support::STALL_KIND))).await.unwrap();
    let err = mgr.query("s1", "ping").await.unwrap_err();
    assert!(matches!(err, ManagerError::Timeout(_)));
}
