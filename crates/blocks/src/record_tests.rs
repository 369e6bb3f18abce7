// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use streamtools_core::{BlockId, LogBus};
use streamtools_runtime::spawn_block;
use tokio::sync::oneshot;

async fn query_last(
    query_tx: &mpsc::Sender<QueryMsg>,
) -> serde_json::Value {
    let (reply_tx, reply_rx) = oneshot::channel();
    query_tx.send(QueryMsg { route: "last".into(), reply: reply_tx }).await.unwrap();
    tokio::time::timeout(Duration::from_millis(200), reply_rx).await.unwrap().unwrap()
}

#[tokio::test]
async fn last_is_null_before_any_message() {
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let (chans, _def, handle) = spawn_block(BlockId::new("b1"), log, factory());

    assert_eq!(query_last(&chans.query_tx).await, serde_json::Value::Null);

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn last_reflects_the_most_recent_message() {
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let (chans, _def, handle) = spawn_block(BlockId::new("b1"), log, factory());

    chans.in_tx.send(Msg::new("in", serde_json::json!({"x": 1}))).await.unwrap();
    chans.in_tx.send(Msg::new("in", serde_json::json!({"x": 2}))).await.unwrap();

    // Synchronize via a query round-trip instead of a sleep.
    let mut last = query_last(&chans.query_tx).await;
    for _ in 0..20 {
        if last == serde_json::json!({"x": 2}) {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
        last = query_last(&chans.query_tx).await;
    }
    assert_eq!(last, serde_json::json!({"x": 2}));

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}
