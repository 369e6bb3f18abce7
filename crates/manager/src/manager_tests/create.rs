// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::support::{block_req, manager};
use crate::error::ManagerError;
use streamtools_wire::CreateBlockRequest;

#[tokio::test]
async fn creates_a_block_with_the_requested_id_and_kind() {
    let mgr = manager();
    let info = mgr.create(Some(block_req("b1", streamtools_blocks::identity::KIND))).await.unwrap();
    assert_eq!(info.id.as_str(), "b1");
    assert_eq!(info.kind, streamtools_blocks::identity::KIND);
    assert_eq!(info.rule, serde_json::Value::Null);
}

#[tokio::test]
async fn empty_id_draws_a_generated_one() {
    let mgr = manager();
    let info = mgr.create(Some(block_req("", streamtools_blocks::identity::KIND))).await.unwrap();
    assert!(!info.id.as_str().is_empty());
}

#[tokio::test]
async fn duplicate_id_is_a_conflict() {
    let mgr = manager();
    mgr.create(Some(block_req("b1", streamtools_blocks::identity::KIND))).await.unwrap();
    let err = mgr.create(Some(block_req("b1", streamtools_blocks::identity::KIND))).await.unwrap_err();
    assert!(matches!(err, ManagerError::Conflict(id) if id == "b1"));
}

#[tokio::test]
async fn unknown_kind_is_not_found() {
    let mgr = manager();
    let err = mgr.create(Some(block_req("b1", "no-such-kind"))).await.unwrap_err();
    assert!(matches!(err, ManagerError::NotFound(_)));
}

#[tokio::test]
async fn unsafe_id_is_rejected() {
    let mgr = manager();
    let err = mgr.create(Some(block_req("DAEMON", streamtools_blocks::identity::KIND))).await.unwrap_err();
    assert!(matches!(err, ManagerError::InvalidArgument(_)));
}

#[tokio::test]
async fn missing_request_is_an_invalid_argument() {
    let mgr = manager();
    let err = mgr.create(None).await.unwrap_err();
    assert!(matches!(err, ManagerError::InvalidArgument(_)));
}

#[tokio::test]
async fn supplied_rule_is_pushed_to_the_block_and_recorded() {
    let mgr = manager();
    let req = CreateBlockRequest {
        id: "f1".into(),
        kind: streamtools_blocks::filter::KIND.into(),
        rule: Some(serde_json::json!({"field": "kind", "equals": "a"})),
        position: None,
    };
    let info = mgr.create(Some(req)).await.unwrap();
    assert_eq!(info.rule, serde_json::json!({"field": "kind", "equals": "a"}));

    let echoed = mgr.query_connection("f1", "rule").await;
    // `query_connection` only targets connections; querying the block's
    // own `rule` route goes through `query` instead.
    assert!(matches!(echoed, Err(ManagerError::NotFound(_))));
    let echoed = mgr.query("f1", "rule").await.unwrap();
    assert_eq!(echoed, serde_json::json!({"field": "kind", "equals": "a"}));
}

#[tokio::test]
async fn kind_with_no_rule_route_leaves_rule_null_when_unsupplied() {
    let mgr = manager();
    let info = mgr.create(Some(block_req("r1", streamtools_blocks::record::KIND))).await.unwrap();
    assert_eq!(info.rule, serde_json::Value::Null);
}
