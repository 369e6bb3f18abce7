// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use streamtools_core::{BlockId, LogBus, LogKind};
use streamtools_runtime::spawn_block;

#[tokio::test]
async fn writes_each_message_to_the_log_stream() {
    let (log, mut log_rx, _ui_rx) = LogBus::new();
    let (chans, _def, handle) = spawn_block(BlockId::new("b1"), log, factory());

    chans.in_tx.send(Msg::new("in", serde_json::json!({"hello": "world"}))).await.unwrap();

    let record = tokio::time::timeout(Duration::from_millis(200), log_rx.recv())
        .await
        .expect("log record must arrive promptly")
        .unwrap();
    assert_eq!(record.kind, LogKind::Info);
    assert_eq!(record.id, "b1");
    assert_eq!(record.data, serde_json::json!({"hello": "world"}));

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}
