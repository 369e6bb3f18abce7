// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Synthetic block kinds for the property tests in spec.md §8 that
//! need a plug-in whose `run` deliberately never touches its route
//! channels — gated behind `test-support` so the production registry
//! never accidentally picks these up.

use async_trait::async_trait;
use streamtools_core::Msg;
use streamtools_runtime::{Block, BlockBuilder, QueryMsg, RunHandles};
use tokio::sync::mpsc;

pub const STALL_KIND: &str = "test-stall";

/// Declares `in` and `ping` routes and a broadcast output but its
/// `run` only ever waits on `Quit` — models "a synthetic block whose
/// `Run` sleeps forever" (spec.md §8, property 4: no-blocking-drop;
/// property 5: status timeout).
pub fn stall_factory() -> Box<dyn Block> {
    Box::new(StallBlock::default())
}

#[derive(Default)]
pub struct StallBlock {
    in_rx: Option<mpsc::Receiver<Msg>>,
    ping_rx: Option<mpsc::Receiver<QueryMsg>>,
    out_tx: Option<mpsc::Sender<Msg>>,
}

#[async_trait]
impl Block for StallBlock {
    fn kind(&self) -> &'static str {
        STALL_KIND
    }

    fn setup(&mut self, ctl: &mut BlockBuilder) {
        self.in_rx = Some(ctl.in_route("in"));
        self.ping_rx = Some(ctl.query_route("ping"));
        self.out_tx = Some(ctl.broadcast());
    }

    async fn run(mut self: Box<Self>, ctl: RunHandles) {
        // Hold every channel open (so the multiplexer's drop policy
        // has something to overflow against) but never read from or
        // write to any of them until told to quit.
        let _in_rx = self.in_rx.take();
        let _ping_rx = self.ping_rx.take();
        let _out_tx = self.out_tx.take();
        let _ = ctl.quit.await;
    }
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
