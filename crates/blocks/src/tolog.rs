// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tolog`: writes every message received on `in` to the log bus as
//! an `INFO` record and does not forward it anywhere — a terminal
//! sink, standing in for the original's log-output block kind.

use async_trait::async_trait;
use serde_json::json;
use streamtools_core::Msg;
use streamtools_runtime::{Block, BlockBuilder, QueryMsg, RunHandles};
use tokio::sync::mpsc;

pub const KIND: &str = "tolog";

pub fn factory() -> Box<dyn Block> {
    Box::new(ToLogBlock::default())
}

#[derive(Default)]
pub struct ToLogBlock {
    in_rx: Option<mpsc::Receiver<Msg>>,
    ping_rx: Option<mpsc::Receiver<QueryMsg>>,
}

#[async_trait]
impl Block for ToLogBlock {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn setup(&mut self, ctl: &mut BlockBuilder) {
        self.in_rx = Some(ctl.in_route("in"));
        self.ping_rx = Some(ctl.query_route("ping"));
    }

    async fn run(mut self: Box<Self>, mut ctl: RunHandles) {
        // `setup` always populates these before the multiplexer spawns `run`.
        #[allow(clippy::expect_used)]
        let mut in_rx = self.in_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let mut ping_rx = self.ping_rx.take().expect("setup runs before run");

        loop {
            tokio::select! {
                Some(msg) = in_rx.recv() => {
                    ctl.log.info(ctl.id.as_str(), msg.payload);
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
#[path = "tolog_tests.rs"]
mod tests;
