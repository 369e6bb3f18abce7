// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::time::Duration;
use streamtools_core::BlockId;

/// Forwards every message received on `"in"` to its broadcast output,
/// echoing on `"rule"` too. Never reads anything on purpose when
/// `stall` is set, to exercise the drop-under-backpressure path.
struct EchoBlock {
    stall: bool,
}

#[async_trait]
impl Block for EchoBlock {
    fn kind(&self) -> &'static str {
        "test-echo"
    }

    fn setup(&mut self, ctl: &mut BlockBuilder) {
        ctl.in_route("in");
        ctl.query_route("rule");
        ctl.broadcast();
    }

    async fn run(self: Box<Self>, ctl: RunHandles) {
        if self.stall {
            // Deliberately never touch its route channels — models the
            // "sleeps forever" property-test block.
            let _ = ctl.quit.await;
            return;
        }
        unreachable!("not exercised by these tests");
    }
}

fn spawn_echo(stall: bool) -> (BlockChans, BlockDef, JoinHandle<()>) {
    let (log, _log_rx, _ui_rx) = LogBus::new();
    spawn_block(BlockId::new("b1"), log, Box::new(EchoBlock { stall }))
}

#[tokio::test]
async fn setup_declares_the_routes_the_plugin_registered() {
    let (_chans, def, handle) = spawn_echo(true);
    assert!(def.declares_in_route("in"));
    assert!(def.declares_query_route("rule"));
    assert!(def.out_routes.contains("out"));
    handle.abort();
}

#[tokio::test]
async fn unknown_route_is_silently_skipped() {
    let (chans, _def, handle) = spawn_echo(true);
    chans.in_tx.send(Msg::new("nope", serde_json::json!(1))).await.unwrap();
    // Give the multiplexer a chance to process; nothing should panic
    // or hang since the route isn't forwarded anywhere.
    tokio::time::sleep(Duration::from_millis(10)).await;
    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn known_route_dispatches_without_blocking_under_sustained_overflow() {
    let (chans, _def, handle) = spawn_echo(true);

    // The plug-in never reads "in", so its 1000-slot buffer fills and
    // every further send must be dropped rather than block the sender.
    let burst = async {
        for i in 0..2_000 {
            chans.in_tx.send(Msg::new("in", serde_json::json!(i))).await.unwrap();
        }
    };
    tokio::time::timeout(Duration::from_secs(5), burst)
        .await
        .expect("sender must never block on a stalled route");

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn rule_route_also_emits_a_ui_update() {
    let (log, _log_rx, mut ui_rx) = LogBus::new();
    let (chans, _def, handle) =
        spawn_block(BlockId::new("b1"), log, Box::new(EchoBlock { stall: true }));

    chans.in_tx.send(Msg::new("rule", serde_json::json!({"window": 5}))).await.unwrap();
    let record = ui_rx.recv().await.expect("rule update should be published");
    assert_eq!(record.kind, LogKind::RuleUpdated);
    assert_eq!(record.data, serde_json::json!({"window": 5}));

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn add_and_del_mutate_the_fanout_map() {
    let (chans, _def, handle) = spawn_echo(true);
    let (target_tx, mut target_rx) = mpsc::channel(BROADCAST_BUFFER);

    chans
        .add_tx
        .send(AddChanMsg { route: "downstream".into(), channel: target_tx })
        .await
        .unwrap();

    chans.del_tx.send("downstream".into()).await.unwrap();
    // After deletion the fan-out map no longer holds the target; since
    // this block's `run` never writes to broadcast, assert indirectly
    // by checking the receiver sees nothing and the manager can still
    // tear things down cleanly.
    assert!(target_rx.try_recv().is_err());

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn unknown_query_route_replies_with_an_error() {
    let (chans, _def, handle) = spawn_echo(true);
    let (reply_tx, reply_rx) = oneshot::channel();
    chans
        .query_tx
        .send(QueryMsg { route: "nope".into(), reply: reply_tx })
        .await
        .unwrap();
    let reply = reply_rx.await.unwrap();
    assert_eq!(reply, serde_json::json!({"error": "unknown route"}));

    chans.quit_tx.send(()).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn quit_tears_down_both_tasks() {
    let (chans, _def, handle) = spawn_echo(true);
    chans.quit_tx.send(()).await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("quit must terminate the block promptly")
        .unwrap();
}
