// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `record`: stores the last value received on `in`, answering the
//! `last` query route with it — the sink block in the pass-through
//! chain seed scenario (spec.md §8.1).

use async_trait::async_trait;
use serde_json::json;
use streamtools_core::Msg;
use streamtools_runtime::{Block, BlockBuilder, QueryMsg, RunHandles};
use tokio::sync::mpsc;

pub const KIND: &str = "record";

pub fn factory() -> Box<dyn Block> {
    Box::new(RecordBlock::default())
}

#[derive(Default)]
pub struct RecordBlock {
    in_rx: Option<mpsc::Receiver<Msg>>,
    last_rx: Option<mpsc::Receiver<QueryMsg>>,
    ping_rx: Option<mpsc::Receiver<QueryMsg>>,
}

#[async_trait]
impl Block for RecordBlock {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn setup(&mut self, ctl: &mut BlockBuilder) {
        self.in_rx = Some(ctl.in_route("in"));
        self.last_rx = Some(ctl.query_route("last"));
        self.ping_rx = Some(ctl.query_route("ping"));
    }

    async fn run(mut self: Box<Self>, mut ctl: RunHandles) {
        // `setup` always populates these before the multiplexer spawns `run`.
        #[allow(clippy::expect_used)]
        let mut in_rx = self.in_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let mut last_rx = self.last_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let mut ping_rx = self.ping_rx.take().expect("setup runs before run");
        let mut last: Option<serde_json::Value> = None;

        loop {
            tokio::select! {
                Some(msg) = in_rx.recv() => {
                    last = Some(msg.payload);
                }
                Some(query) = last_rx.recv() => {
                    let _ = query.reply.send(last.clone().unwrap_or(serde_json::Value::Null));
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
#[path = "record_tests.rs"]
mod tests;
