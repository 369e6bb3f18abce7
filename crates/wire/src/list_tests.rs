// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use streamtools_core::{BlockId, Position};

#[test]
fn empty_list_responses_serialize_as_empty_arrays() {
    let resp = ListBlocksResponse::default();
    assert_eq!(serde_json::to_value(&resp).unwrap(), serde_json::json!({"blocks": []}));
}

#[test]
fn list_blocks_response_roundtrips() {
    let resp = ListBlocksResponse {
        blocks: vec![BlockInfo {
            id: BlockId::new("b1"),
            kind: "count".into(),
            rule: serde_json::json!({}),
            position: Position::default(),
        }],
    };
    let encoded = serde_json::to_string(&resp).unwrap();
    let decoded: ListBlocksResponse = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, resp);
}
