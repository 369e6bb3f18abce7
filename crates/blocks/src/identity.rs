// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `identity`: forwards every message received on `in` straight to
//! broadcast, unmodified. The simplest possible plug-in, and the
//! source block in the pass-through-chain seed scenario (spec.md §8.1).

use async_trait::async_trait;
use serde_json::json;
use streamtools_runtime::{Block, BlockBuilder, QueryMsg, RunHandles};
use tokio::sync::mpsc;

pub const KIND: &str = "identity";

pub fn factory() -> Box<dyn Block> {
    Box::new(IdentityBlock::default())
}

#[derive(Default)]
pub struct IdentityBlock {
    in_rx: Option<mpsc::Receiver<streamtools_core::Msg>>,
    out_tx: Option<mpsc::Sender<streamtools_core::Msg>>,
    ping_rx: Option<mpsc::Receiver<QueryMsg>>,
}

#[async_trait]
impl Block for IdentityBlock {
    fn kind(&self) -> &'static str {
        KIND
    }

    fn setup(&mut self, ctl: &mut BlockBuilder) {
        self.in_rx = Some(ctl.in_route("in"));
        self.out_tx = Some(ctl.broadcast());
        self.ping_rx = Some(ctl.query_route("ping"));
    }

    async fn run(mut self: Box<Self>, mut ctl: RunHandles) {
        // `setup` always populates these before the multiplexer spawns `run`.
        #[allow(clippy::expect_used)]
        let mut in_rx = self.in_rx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let out_tx = self.out_tx.take().expect("setup runs before run");
        #[allow(clippy::expect_used)]
        let mut ping_rx = self.ping_rx.take().expect("setup runs before run");

        loop {
            tokio::select! {
                Some(msg) = in_rx.recv() => {
                    let _ = out_tx.send(msg).await;
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
#[path = "identity_tests.rs"]
mod tests;
