// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn status_report_roundtrips_through_json() {
    let report = StatusReport {
        id: BlockId::new("b1"),
        status: BlockStatus::TimedOut,
        reply: serde_json::json!("TIMEOUT"),
    };
    let encoded = serde_json::to_string(&report).unwrap();
    let decoded: StatusReport = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, report);
}
