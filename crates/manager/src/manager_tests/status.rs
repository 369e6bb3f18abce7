// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::support::{block_req, manager};
use streamtools_wire::BlockStatus;

#[tokio::test]
async fn status_blocks_reports_ok_for_every_responsive_block() {
    let mgr = manager();
    mgr.create(Some(block_req("a", streamtools_blocks::identity::KIND))).await.unwrap();
    mgr.create(Some(block_req("b", streamtools_blocks::record::KIND))).await.unwrap();

    let reports = mgr.status_blocks().await;
    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert_eq!(report.status, BlockStatus::Ok);
        assert_ne!(report.reply, serde_json::json!("TIMEOUT"));
    }
}

/// spec.md §8 "status timeout": one stalled block among otherwise
/// responsive ones reports `TimedOut`/`"TIMEOUT"` without blocking the
/// other probes.
#[tokio::test]
async fn a_single_stalled_block_times_out_without_blocking_the_others() {
    let mgr = manager();
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
