// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use streamtools_core::{BlockId, LogBus, Msg};
use streamtools_runtime::{spawn_block, AddChanMsg};

#[tokio::test]
async fn forwards_in_to_broadcast_unmodified() {
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let (chans, def, handle) = spawn_block(BlockId::new("b1"), log, factory());
    assert!(def.declares_in_route("in"));
    assert!(def.declares_query_route("ping"));
    assert!(def.out_routes.contains("out"));

    let (target_tx, mut target_rx) = mpsc::channel(10);
    chans
        .add_tx
        .send(AddChanMsg { route: "sink".into(), channel: target_tx })
        .await
        .unwrap();

    chans.in_tx.send(Msg::new("in", serde_json::json!({"x": 1}))).await.unwrap();
    let forwarded = tokio::time::timeout(Duration::from_millis(200), target_rx.recv())
        .await
        .expect("forward must arrive promptly")
        .unwrap();
    assert_eq!(forwarded.payload, serde_json::json!({"x": 1}));

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}
