// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `filter`: a rule-configurable pass filter, the one built-in kind
//! that exercises the full `rule` route contract (spec.md §6.3) —
//! atomic replacement on the `rule` in-route, a `rule` query route
//! that echoes the current configuration back (the "rule round-trip"
//! testable property, spec.md §8), and `Error` reporting for
//! malformed updates instead of panicking.
//!
//! With no rule set, every message passes through unchanged. Once a
//! rule `{"field": <string>, "equals": <value>}` is set, only messages
//! whose `payload[field] == equals` are forwarded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use streamtools_core::Msg;
use streamtools_runtime::{Block, BlockBuilder, QueryMsg, RunHandles};
use tokio::sync::mpsc;

pub const KIND: &str = "filter";

pub fn factory() -> Box<dyn Block> {
    Box::new(FilterBlock::default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Rule {
    field: String,
    equals: serde_json::Value,
}

#[derive(Default)]
pub struct FilterBlock {
    in_rx: Option<mpsc::Receiver<Msg>>,
    rule_in_rx: Option<mpsc::Receiver<Msg>>,
    rule_query_rx: Option<mpsc::Receiver<QueryMsg>>,
    ping_rx: Option<mpsc::Receiver<QueryMsg>>,
    out_tx: Option<mpsc::Sender<Msg>>,
}

#[async_trait]
impl Block for FilterBlock {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn setup(&mut self, ctl: &mut BlockBuilder) {
        self.in_rx = Some(ctl.in_route("in"));
        self.rule_in_rx = Some(ctl.in_route("rule"));
        self.rule_query_rx = Some(ctl.query_route("rule"));
        self.ping_rx = Some(ctl.query_route("ping"));
        self.out_tx = Some(ctl.broadcast());
    }

    async fn run(mut self: Box<Self>, mut ctl: RunHandles) {
        // `setup` always populates these before the multiplexer spawns `run`.
        #[allow(clippy::expect_used)]
        let mut in_rx = self.in_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let mut rule_in_rx = self.rule_in_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let mut rule_query_rx = self.rule_query_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let mut ping_rx = self.ping_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let out_tx = self.out_tx.take().expect("setup runs before run");
        let mut rule: Option<Rule> = None;

        loop {
            tokio::select! {
                Some(msg) = in_rx.recv() => {
                    let passes = match &rule {
                        None => true,
                        Some(r) => msg.payload.get(&r.field) == Some(&r.equals),
                    };
                    if passes {
                        let _ = out_tx.send(Msg::new("", msg.payload)).await;
                    }
                }
                Some(msg) = rule_in_rx.recv() => {
                    match serde_json::from_value::<Rule>(msg.payload) {
                        Ok(parsed) => rule = Some(parsed),
                        Err(err) => ctl.log.error(ctl.id.as_str(), json!(format!("invalid rule: {err}"))),
                    }
                }
                Some(query) = rule_query_rx.recv() => {
                    let reply = rule
                        .as_ref()
                        .map(|r| serde_json::to_value(r).unwrap_or(serde_json::Value::Null))
                        .unwrap_or(serde_json::Value::Null);
                    let _ = query.reply.send(reply);
                }
                Some(query) = ping_rx.recv() => {
                    let _ = query.reply.send(json!(KIND));
                }
                _ = &mut ctl.quit => break,
            }
        }
    }
}

#[cfg(test)]
#[path = "filter_tests.rs"]
mod tests;
