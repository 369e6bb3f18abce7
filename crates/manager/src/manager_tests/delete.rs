// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::support::{block_req, manager};
use crate::error::ManagerError;
use streamtools_wire::CreateConnectionRequest;

fn conn_req(id: &str, from_id: &str, to_id: &str, to_route: &str) -> CreateConnectionRequest {
    CreateConnectionRequest { id: id.to_string(), from_id: from_id.to_string(), to_id: to_id.to_string(), to_route: to_route.to_string() }
}

#[tokio::test]
async fn deleting_a_block_cascades_to_every_touching_connection() {
    let mgr = manager();
    mgr.create(Some(block_req("a", streamtools_blocks::identity::KIND))).await.unwrap();
    mgr.create(Some(block_req("b", streamtools_blocks::record::KIND))).await.unwrap();
    mgr.create(Some(block_req("c", streamtools_blocks::record::KIND))).await.unwrap();
    mgr.connect(Some(conn_req("c1", "a", "b", "in"))).await.unwrap();
    mgr.connect(Some(conn_req("c2", "a", "c", "in"))).await.unwrap();

    let deleted = mgr.delete_block("a").await.unwrap();
    assert_eq!(deleted.len(), 3);
    assert!(deleted.contains(&"c1".to_string()));
    assert!(deleted.contains(&"c2".to_string()));
    assert_eq!(deleted.last(), Some(&"a".to_string()));

    assert!(mgr.get_block("a").is_none());
    assert!(mgr.get_connection("c1").is_none());
    assert!(mgr.get_connection("c2").is_none());
    assert!(mgr.list_connections().is_empty());
}

#[tokio::test]
async fn deleting_an_unknown_block_is_not_found() {
    let mgr = manager();
    let err = mgr.delete_block("nope").await.unwrap_err();
    assert!(matches!(err, ManagerError::NotFound(_)));
}

#[tokio::test]
async fn deleting_one_connection_leaves_its_endpoints_and_other_connections_intact() {
    let mgr = manager();
    mgr.create(Some(block_req("a", streamtools_blocks::identity::KIND))).await.unwrap();
    mgr.create(Some(block_req("b", streamtools_blocks::record::KIND))).await.unwrap();
    mgr.create(Some(block_req("c", streamtools_blocks::record::KIND))).await.unwrap();
    mgr.connect(Some(conn_req("c1", "a", "b", "in"))).await.unwrap();
    mgr.connect(Some(conn_req("c2", "a", "c", "in"))).await.unwrap();

    mgr.delete_connection("c1").await.unwrap();

    assert!(mgr.get_block("a").is_some());
    assert!(mgr.get_block("b").is_some());
    assert!(mgr.get_connection("c1").is_none());
    assert!(mgr.get_connection("c2").is_some());
}

#[tokio::test]
async fn deleting_an_unknown_connection_is_not_found() {
    let mgr = manager();
    let err = mgr.delete_connection("nope").await.unwrap_err();
    assert!(matches!(err, ManagerError::NotFound(_)));
}
