// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use streamtools_core::{BlockId, LogBus};
use streamtools_runtime::spawn_block;

#[tokio::test]
async fn sends_never_block_even_when_nothing_is_ever_read() {
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let (chans, _def, handle) = spawn_block(BlockId::new("b1"), log, stall_factory());

    let burst = async {
        for i in 0..2_000 {
            chans.in_tx.send(Msg::new("in", serde_json::json!(i))).await.unwrap();
        }
    };
    tokio::time::timeout(Duration::from_secs(5), burst)
        .await
        .expect("sender must never block on a stalled block");

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn query_against_a_stalled_block_eventually_times_out_the_caller_side() {
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let (chans, _def, handle) = spawn_block(BlockId::new("b1"), log, stall_factory());

    // The block never reads its query route; the *caller* (normally
    // the manager) is responsible for timing out — here we just prove
    // the reply channel is never answered within a short window.
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
    chans
        .query_tx
        .send(QueryMsg { route: "ping".into(), reply: reply_tx })
        .await
        .unwrap();
    assert!(tokio::time::timeout(Duration::from_millis(100), reply_rx).await.is_err());

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}
