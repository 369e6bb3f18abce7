// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The connection task: carries messages between two blocks while
//! tracking a rolling throughput estimate, grounded on
//! `ConnectionRoutine` in `st/blocks/blocks.go`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use streamtools_core::{Clock, ConnectionId, LogBus, LogKind, Msg};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::block::AddChanMsg;

/// Width of the rolling timestamp window used for rate estimation
/// (spec.md §4.2).
const RATE_WINDOW: usize = 100;
const RATE_REPORT_INTERVAL: Duration = Duration::from_millis(200);
const CONTROL_BUFFER: usize = 1;

/// A query against a connection's `"last"` or `"rate"` route.
pub struct ConnectionQuery {
    pub route: String,
    pub reply: oneshot::Sender<serde_json::Value>,
}

/// The manager-facing control channels of a running connection.
#[derive(Clone)]
pub struct ConnectionChans {
    pub in_tx: mpsc::Sender<Msg>,
    pub query_tx: mpsc::Sender<ConnectionQuery>,
    pub add_tx: mpsc::Sender<AddChanMsg>,
    pub del_tx: mpsc::Sender<String>,
    pub quit_tx: mpsc::Sender<()>,
}

struct ConnectionChanReceivers {
    in_rx: mpsc::Receiver<Msg>,
    query_rx: mpsc::Receiver<ConnectionQuery>,
    add_rx: mpsc::Receiver<AddChanMsg>,
    del_rx: mpsc::Receiver<String>,
    quit_rx: mpsc::Receiver<()>,
}

fn connection_chans() -> (ConnectionChans, ConnectionChanReceivers) {
    let (in_tx, in_rx) = mpsc::channel(CONTROL_BUFFER);
    let (query_tx, query_rx) = mpsc::channel(CONTROL_BUFFER);
    let (add_tx, add_rx) = mpsc::channel(CONTROL_BUFFER);
    let (del_tx, del_rx) = mpsc::channel(CONTROL_BUFFER);
    let (quit_tx, quit_rx) = mpsc::channel(CONTROL_BUFFER);
    (
        ConnectionChans { in_tx, query_tx, add_tx, del_tx, quit_tx },
        ConnectionChanReceivers { in_rx, query_rx, add_rx, del_rx, quit_rx },
    )
}

/// Rolling window of the last `RATE_WINDOW` message timestamps,
/// exactly the original's `times`/`timesIdx` pair: `idx` starts at
/// `RATE_WINDOW` (no samples yet) and only ever decreases, floored at
/// zero once the window has filled.
struct RateWindow {
    times: [i64; RATE_WINDOW],
    idx: usize,
}

impl RateWindow {
    fn new() -> Self {
        Self { times: [0; RATE_WINDOW], idx: RATE_WINDOW }
    }

    fn record(&mut self, now_ns: i64) {
        self.times.copy_within(1.., 0);
        self.times[RATE_WINDOW - 1] = now_ns;
        self.idx = self.idx.saturating_sub(1);
    }

    /// Messages per second over the current window, `0.0` before the
    /// first sample or if the clock hasn't advanced.
    fn rate(&self, now_ns: i64) -> f64 {
        let valid = RATE_WINDOW - self.idx;
        if valid == 0 {
            return 0.0;
        }
        let elapsed = now_ns - self.times[self.idx];
        if elapsed <= 0 {
            return 0.0;
        }
        1e9 * valid as f64 / elapsed as f64
    }
}

/// Spawns a connection's routine, returning its control channels and a
/// handle that completes once `QuitChan` fires.
///
/// `to_route` is the sink block's inbound port this connection was
/// created to feed (spec.md §4.2): every forwarded message is
/// relabeled onto that route, regardless of what route it arrived
/// under — a connection has exactly one destination route, fixed at
/// creation.
pub fn spawn_connection(
    id: ConnectionId,
    to_route: String,
    clock: Arc<dyn Clock>,
    log: LogBus,
) -> (ConnectionChans, JoinHandle<()>) {
    let (chans, rx) = connection_chans();
    let handle = tokio::spawn(run_connection(id, to_route, clock, log, rx));
    (chans, handle)
}

async fn run_connection(
    id: ConnectionId,
    to_route: String,
    clock: Arc<dyn Clock>,
    log: LogBus,
    mut rx: ConnectionChanReceivers,
) {
    let mut fanout: HashMap<String, mpsc::Sender<Msg>> = HashMap::new();
    let mut window = RateWindow::new();
    let mut last: Option<serde_json::Value> = None;
    let mut report = tokio::time::interval(RATE_REPORT_INTERVAL);

    loop {
        tokio::select! {
            Some(msg) = rx.in_rx.recv() => {
                let now = clock.now_ns();
                window.record(now);
                last = Some(msg.payload.clone());
                let out = Msg::new(to_route.clone(), msg.payload);
                for target in fanout.values() {
                    let _ = target.send(out.clone()).await;
                }
            }
            Some(query) = rx.query_rx.recv() => {
                let reply = match query.route.as_str() {
                    "last" => Some(json!({"Last": last.clone().unwrap_or(serde_json::Value::Null)})),
                    "rate" => Some(json!({"Rate": window.rate(clock.now_ns())})),
                    _ => None,
                };
                if let Some(reply) = reply {
                    let _ = query.reply.send(reply);
                }
            }
            Some(add) = rx.add_rx.recv() => {
                fanout.insert(add.route, add.channel);
            }
            Some(route) = rx.del_rx.recv() => {
                fanout.remove(&route);
            }
            _ = report.tick() => {
                log.ui(id.as_str(), LogKind::UpdateRate, json!(window.rate(clock.now_ns())));
            }
            Some(()) = rx.quit_rx.recv() => {
                log.info(id.as_str(), json!(format!("Connection {id} Quitting...")));
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
