// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `count`: counts messages received on `in`, broadcasting the
//! running total after each one and answering the `count` query route
//! with the same value.

use async_trait::async_trait;
use serde_json::json;
use streamtools_core::Msg;
use streamtools_runtime::{Block, BlockBuilder, QueryMsg, RunHandles};
use tokio::sync::mpsc;

pub const KIND: &str = "count";

pub fn factory() -> Box<dyn Block> {
    Box::new(CountBlock::default())
}

#[derive(Default)]
pub struct CountBlock {
    in_rx: Option<mpsc::Receiver<Msg>>,
    count_rx: Option<mpsc::Receiver<QueryMsg>>,
    ping_rx: Option<mpsc::Receiver<QueryMsg>>,
    out_tx: Option<mpsc::Sender<Msg>>,
}

#[async_trait]
impl Block for CountBlock {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn setup(&mut self, ctl: &mut BlockBuilder) {
        self.in_rx = Some(ctl.in_route("in"));
        self.count_rx = Some(ctl.query_route("count"));
        self.ping_rx = Some(ctl.query_route("ping"));
        self.out_tx = Some(ctl.broadcast());
    }

    async fn run(mut self: Box<Self>, mut ctl: RunHandles) {
        // `setup` always populates these before the multiplexer spawns `run`.
        #[allow(clippy::expect_used)]
        let mut in_rx = self.in_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let mut count_rx = self.count_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let mut ping_rx = self.ping_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let out_tx = self.out_tx.take().expect("setup runs before run");
        let mut count: u64 = 0;

        loop {
            tokio::select! {
                Some(_msg) = in_rx.recv() => {
                    count += 1;
                    let _ = out_tx.send(Msg::new("", json!({"count": count}))).await;
                }
                Some(query) = count_rx.recv() => {
                    let _ = query.reply.send(json!({"count": count}));
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
#[path = "count_tests.rs"]
mod tests;
