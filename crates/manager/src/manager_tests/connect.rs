// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use super::support::{block_req, manager};
use crate::error::ManagerError;
use streamtools_wire::CreateConnectionRequest;

fn conn_req(id: &str, from_id: &str, to_id: &str, to_route: &str) -> CreateConnectionRequest {
    CreateConnectionRequest { id: id.to_string(), from_id: from_id.to_string(), to_id: to_id.to_string(), to_route: to_route.to_string() }
}

#[tokio::test]
async fn connects_two_existing_blocks_and_forwards_messages() {
    let mgr = manager();
    mgr.create(Some(block_req("a", streamtools_blocks::identity::KIND))).await.unwrap();
    mgr.create(Some(block_req("b", streamtools_blocks::record::KIND))).await.unwrap();
    let info = mgr.connect(Some(conn_req("c1", "a", "b", "in"))).await.unwrap();
    assert_eq!(info.id.as_str(), "c1");
    assert_eq!(info.to_route, "in");

    mgr.send("a", "in", serde_json::json!(42)).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    let last = mgr.query("b", "last").await.unwrap();
    assert_eq!(last, serde_json::json!(42));
}

#[tokio::test]
async fn missing_source_block_is_not_found() {
    let mgr = manager();
    mgr.create(Some(block_req("b", streamtools_blocks::record::KIND))).await.unwrap();
    let err = mgr.connect(Some(conn_req("c1", "nope", "b", "in"))).await.unwrap_err();
    assert!(matches!(err, ManagerError::NotFound(_)));
}

#[tokio::test]
async fn missing_sink_block_is_not_found() {
    let mgr = manager();
    mgr.create(Some(block_req("a", streamtools_blocks::identity::KIND))).await.unwrap();
    let err = mgr.connect(Some(conn_req("c1", "a", "nope", "in"))).await.unwrap_err();
    assert!(matches!(err, ManagerError::NotFound(_)));
}

#[tokio::test]
async fn duplicate_connection_id_is_a_conflict() {
    let mgr = manager();
    mgr.create(Some(block_req("a", streamtools_blocks::identity::KIND))).await.unwrap();
    mgr.create(Some(block_req("b", streamtools_blocks::record::KIND))).await.unwrap();
    mgr.connect(Some(conn_req("c1", "a", "b", "in"))).await.unwrap();
    let err = mgr.connect(Some(conn_req("c1", "a", "b", "in"))).await.unwrap_err();
    assert!(matches!(err, ManagerError::Conflict(id) if id == "c1"));
}

#[tokio::test]
async fn list_connections_reports_every_registered_edge() {
    let mgr = manager();
    mgr.create(Some(block_req("a", streamtools_blocks::identity::KIND))).await.unwrap();
    mgr.create(Some(block_req("b", streamtools_blocks::record::KIND))).await.unwrap();
    mgr.connect(Some(conn_req("c1", "a", "b", "in"))).await.unwrap();

    let conns = mgr.list_connections();
    assert_eq!(conns.len(), 1);
    assert_eq!(conns[0].from_id.as_str(), "a");
    assert_eq!(conns[0].to_id.as_str(), "b");
}
