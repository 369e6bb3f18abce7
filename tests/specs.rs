// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end scenarios exercising the whole stack (`streamtools-core`
//! through `streamtools-blocks`) the way a real graph would be wired,
//! adapted from the teacher's root `oj-specs` integration package.

use std::sync::Arc;
use std::time::Duration;

use streamtools_core::{Clock, FakeClock, LogBus};
use streamtools_manager::{BlockLibrary, BlockManager};
use streamtools_wire::{BlockStatus, CreateBlockRequest, CreateConnectionRequest};

fn library() -> BlockLibrary {
    let mut lib = BlockLibrary::new();
    lib.register(streamtools_blocks::identity::KIND, streamtools_blocks::identity::factory);
    lib.register(streamtools_blocks::record::KIND, streamtools_blocks::record::factory);
    lib.register(streamtools_blocks::count::KIND, streamtools_blocks::count::factory);
    lib.register(streamtools_blocks::test_support::STALL_KIND, streamtools_blocks::test_support::stall_factory);
    lib
}

fn block_req(id: &str, kind: &str) -> CreateBlockRequest {
    CreateBlockRequest { id: id.to_string(), kind: kind.to_string(), rule: None, position: None }
}

fn conn_req(id: &str, from_id: &str, to_id: &str, to_route: &str) -> CreateConnectionRequest {
    CreateConnectionRequest { id: id.to_string(), from_id: from_id.to_string(), to_id: to_id.to_string(), to_route: to_route.to_string() }
}

/// spec.md §8, scenario 1: a message sent into a source block arrives,
/// relabeled onto its destination route, at the sink block on the
/// other end of a connection.
#[tokio::test]
async fn pass_through_chain_delivers_the_payload_end_to_end() {
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let mgr = BlockManager::new(library(), log, clock);

    let source = mgr.create(Some(block_req("source", streamtools_blocks::identity::KIND))).await.unwrap();
    let sink = mgr.create(Some(block_req("sink", streamtools_blocks::record::KIND))).await.unwrap();
    mgr.connect(Some(conn_req("c1", source.id.as_str(), sink.id.as_str(), "in"))).await.unwrap();

    mgr.send(source.id.as_str(), "in", serde_json::json!({"value": 7})).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let last = mgr.query(sink.id.as_str(), "last").await.unwrap();
    assert_eq!(last, serde_json::json!({"value": 7}));
}

/// spec.md §8, scenario 2: deleting a block in the middle of a chain
/// tears down every connection touching it, leaving the rest intact.
#[tokio::test]
async fn cascading_delete_removes_every_touching_connection() {
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let mgr = BlockManager::new(library(), log, clock);

    let a = mgr.create(Some(block_req("a", streamtools_blocks::identity::KIND))).await.unwrap();
    let b = mgr.create(Some(block_req("b", streamtools_blocks::identity::KIND))).await.unwrap();
    let c = mgr.create(Some(block_req("c", streamtools_blocks::record::KIND))).await.unwrap();
    mgr.connect(Some(conn_req("ab", a.id.as_str(), b.id.as_str(), "in"))).await.unwrap();
    mgr.connect(Some(conn_req("bc", b.id.as_str(), c.id.as_str(), "in"))).await.unwrap();

    let deleted = mgr.delete_block(b.id.as_str()).await.unwrap();
    assert!(deleted.contains(&"ab".to_string()));
    assert!(deleted.contains(&"bc".to_string()));
    assert!(deleted.contains(&"b".to_string()));

    assert!(mgr.get_block(b.id.as_str()).is_none());
    assert!(mgr.get_connection("ab").is_none());
    assert!(mgr.get_connection("bc").is_none());
    assert!(mgr.get_block(a.id.as_str()).is_some());
    assert!(mgr.get_block(c.id.as_str()).is_some());
}

/// spec.md §8, scenario 3: a connection's rolling rate estimate tracks
/// constant-spacing traffic within the documented tolerance.
#[tokio::test]
async fn rate_measurement_tracks_constant_spacing_within_tolerance() {
    let clock = FakeClock::new();
    let clock_dyn: Arc<dyn Clock> = Arc::new(clock.clone());
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let mgr = BlockManager::new(library(), log, clock_dyn);

    let source = mgr.create(Some(block_req("source", streamtools_blocks::identity::KIND))).await.unwrap();
    let sink = mgr.create(Some(block_req("sink", streamtools_blocks::record::KIND))).await.unwrap();
    let conn = mgr.connect(Some(conn_req("c1", source.id.as_str(), sink.id.as_str(), "in"))).await.unwrap();

    // 10 messages at a fixed 10ms clock spacing approximate 100msg/s;
    // each send is synchronized with a "last" round-trip on the sink
    // so the connection has recorded the timestamp before the clock
    // advances for the next message.
    for i in 0..10 {
        mgr.send(source.id.as_str(), "in", serde_json::json!(i)).await.unwrap();
        mgr.query(sink.id.as_str(), "last").await.unwrap();
        clock.advance(Duration::from_millis(10));
    }

    let reply = mgr.query_connection(conn.id.as_str(), "rate").await.unwrap();
    let rate = reply["Rate"].as_f64().unwrap();
    assert!((80.0..=120.0).contains(&rate), "rate = {rate}");
}

/// spec.md §8, scenario 4: a stalled block's inbound channel fills up
/// and starts dropping messages, but sends into it never block the
/// caller, even under a sustained burst.
#[tokio::test]
async fn sends_into_a_stalled_block_never_block_the_caller() {
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let mgr = BlockManager::new(library(), log, clock);

    let stalled = mgr.create(Some(block_req("s", streamtools_blocks::test_support::STALL_KIND))).await.unwrap();

    let burst = async {
        for i in 0..2_000 {
            mgr.send(stalled.id.as_str(), "in", serde_json::json!(i)).await.unwrap();
        }
    };
    tokio::time::timeout(Duration::from_secs(5), burst)
        .await
        .expect("sends must never block on a stalled block");
}

/// spec.md §8, scenario 5: probing every block's status reports one
/// `TimedOut` entry for the stalled block without delaying the
/// otherwise-responsive ones.
#[tokio::test]
async fn status_probe_reports_a_single_timeout_among_responsive_blocks() {
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let mgr = BlockManager::new(library(), log, clock);

    mgr.create(Some(block_req("a", streamtools_blocks::identity::KIND))).await.unwrap();
    mgr.create(Some(block_req("s", streamtools_blocks::test_support::STALL_KIND))).await.unwrap();
    mgr.create(Some(block_req("b", streamtools_blocks::record::KIND))).await.unwrap();

    let reports = mgr.status_blocks().await;
    assert_eq!(reports.len(), 3);

    let stalled = reports.iter().find(|r| r.id.as_str() == "s").unwrap();
    assert_eq!(stalled.status, BlockStatus::TimedOut);
    assert_eq!(stalled.reply, serde_json::json!("TIMEOUT"));
    for id in ["a", "b"] {
        let ok = reports.iter().find(|r| r.id.as_str() == id).unwrap();
        assert_eq!(ok.status, BlockStatus::Ok);
    }
}

/// spec.md §8, scenario 6: pre-seeding the id the generator would draw
/// next forces it to skip past the collision.
#[tokio::test]
async fn block_creation_skips_a_preseeded_id_collision() {
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let (log, _log_rx, _ui_rx) = LogBus::new();
    let mgr = BlockManager::new(library(), log, clock);

    mgr.create(Some(block_req("1", streamtools_blocks::identity::KIND))).await.unwrap();
    let generated = mgr.create(Some(block_req("", streamtools_blocks::identity::KIND))).await.unwrap();
    assert_ne!(generated.id.as_str(), "1");
}
