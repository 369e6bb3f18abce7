// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::support::{block_req, manager};

/// spec.md §8 "unique-id collision": a caller can pre-seed a block
/// with a block id the generator would otherwise draw next; the
/// generator must skip it rather than hand it out a second time.
#[tokio::test]
async fn generated_ids_skip_a_preseeded_collision() {
    let mgr = manager();
    // The generator starts at "1"; seed "1" directly so the first
    // auto-generated id must skip past it.
    mgr.create(Some(block_req("1", streamtools_blocks::identity::KIND))).await.unwrap();

    let info = mgr.create(Some(block_req("", streamtools_blocks::identity::KIND))).await.unwrap();
    assert_ne!(info.id.as_str(), "1");
}

#[tokio::test]
async fn successive_generated_ids_are_distinct() {
    let mgr = manager();
    let a = mgr.create(Some(block_req("", streamtools_blocks::identity::KIND))).await.unwrap();
    let b = mgr.create(Some(block_req("", streamtools_blocks::identity::KIND))).await.unwrap();
    assert_ne!(a.id, b.id);
}
