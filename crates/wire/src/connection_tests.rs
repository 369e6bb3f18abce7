// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn connection_info_roundtrips_through_json() {
    let info = ConnectionInfo {
        id: ConnectionId::new("c1"),
        from_id: BlockId::new("b1"),
        to_id: BlockId::new("b2"),
        to_route: "in".into(),
    };
    let encoded = serde_json::to_string(&info).unwrap();
    let decoded: ConnectionInfo = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, info);
}
