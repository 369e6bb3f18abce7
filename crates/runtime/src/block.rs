// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The block task: a plug-in's declared routes wired through one
//! multiplexer loop, grounded on `BlockRoutine` in `st/blocks/blocks.go`.
//!
//! `spawn_block` builds the plug-in's route channels from its `setup`
//! call, then runs the plug-in's own `run` future alongside the
//! multiplexer as two concurrent tasks under one handle — mirroring
//! `bi.Setup(); go bi.Run()` followed by the `BlockRoutine` select loop
//! in the same original goroutine.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::json;
use streamtools_core::{BlockId, LogBus, LogKind, Msg};
use streamtools_wire::BlockDef;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Per-route inbound buffer (spec.md §3.4).
pub const IN_ROUTE_BUFFER: usize = 1000;
/// Per-route query buffer (spec.md §3.4).
pub const QUERY_ROUTE_BUFFER: usize = 1000;
/// Broadcast fan-out buffer (spec.md §3.4).
pub const BROADCAST_BUFFER: usize = 10;
/// Control channels mirror Go's unbuffered-channel rendezvous (spec.md §5).
const CONTROL_BUFFER: usize = 1;

/// A query delivered to a block's `QueryChan`, answered on `reply`.
pub struct QueryMsg {
    pub route: String,
    pub reply: oneshot::Sender<serde_json::Value>,
}

/// Registers a new fan-out target under `route` — a dedup/removal key
/// for the sender, not one of the block's own declared routes.
pub struct AddChanMsg {
    pub route: String,
    pub channel: mpsc::Sender<Msg>,
}

/// The manager-facing control channels of a running block (spec.md §3.1).
#[derive(Clone)]
pub struct BlockChans {
    pub in_tx: mpsc::Sender<Msg>,
    pub query_tx: mpsc::Sender<QueryMsg>,
    pub add_tx: mpsc::Sender<AddChanMsg>,
    pub del_tx: mpsc::Sender<String>,
    pub quit_tx: mpsc::Sender<()>,
}

struct BlockChanReceivers {
    in_rx: mpsc::Receiver<Msg>,
    query_rx: mpsc::Receiver<QueryMsg>,
    add_rx: mpsc::Receiver<AddChanMsg>,
    del_rx: mpsc::Receiver<String>,
    quit_rx: mpsc::Receiver<()>,
}

fn block_chans() -> (BlockChans, BlockChanReceivers) {
    let (in_tx, in_rx) = mpsc::channel(CONTROL_BUFFER);
    let (query_tx, query_rx) = mpsc::channel(CONTROL_BUFFER);
    let (add_tx, add_rx) = mpsc::channel(CONTROL_BUFFER);
    let (del_tx, del_rx) = mpsc::channel(CONTROL_BUFFER);
    let (quit_tx, quit_rx) = mpsc::channel(CONTROL_BUFFER);
    (
        BlockChans { in_tx, query_tx, add_tx, del_tx, quit_tx },
        BlockChanReceivers { in_rx, query_rx, add_rx, del_rx, quit_rx },
    )
}

/// Handles passed to a plug-in's `run`, distinct from the route
/// channels it captured from `BlockBuilder` during `setup`.
pub struct RunHandles {
    pub id: BlockId,
    pub log: LogBus,
    pub quit: oneshot::Receiver<()>,
}

struct MultiplexerPorts {
    in_routes: HashMap<String, mpsc::Sender<Msg>>,
    query_routes: HashMap<String, mpsc::Sender<QueryMsg>>,
    broadcast_rx: Option<mpsc::Receiver<Msg>>,
}

/// Declares a block's routes during `setup`, handing the plug-in its
/// own ends of the channels the multiplexer otherwise owns — the
/// Rust analogue of `Block.InRoute`/`QueryRoute`/`Broadcast`.
#[derive(Default)]
pub struct BlockBuilder {
    in_routes: HashMap<String, mpsc::Sender<Msg>>,
    query_routes: HashMap<String, mpsc::Sender<QueryMsg>>,
    broadcast_rx: Option<mpsc::Receiver<Msg>>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an inbound route, returning the receiving end for the
    /// plug-in to read from in its own `run` loop.
    pub fn in_route(&mut self, route: impl Into<String>) -> mpsc::Receiver<Msg> {
        let (tx, rx) = mpsc::channel(IN_ROUTE_BUFFER);
        self.in_routes.insert(route.into(), tx);
        rx
    }

    /// Declares a query route, returning the receiving end for the
    /// plug-in to answer from in its own `run` loop.
    pub fn query_route(&mut self, route: impl Into<String>) -> mpsc::Receiver<QueryMsg> {
        let (tx, rx) = mpsc::channel(QUERY_ROUTE_BUFFER);
        self.query_routes.insert(route.into(), tx);
        rx
    }

    /// Opts into fan-out, returning the sending end the plug-in uses
    /// to emit outbound messages.
    pub fn broadcast(&mut self) -> mpsc::Sender<Msg> {
        let (tx, rx) = mpsc::channel(BROADCAST_BUFFER);
        self.broadcast_rx = Some(rx);
        tx
    }

    fn finish(self, kind: &'static str) -> (BlockDef, MultiplexerPorts) {
        let mut def = BlockDef::new(kind);
        def.in_routes.extend(self.in_routes.keys().cloned());
        def.query_routes.extend(self.query_routes.keys().cloned());
        if self.broadcast_rx.is_some() {
            def.out_routes.insert("out".to_string());
        }
        (
            def,
            MultiplexerPorts {
                in_routes: self.in_routes,
                query_routes: self.query_routes,
                broadcast_rx: self.broadcast_rx,
            },
        )
    }
}

/// Declares a throwaway instance's routes and returns its [`BlockDef`]
/// without spawning anything — the plug-in library's startup-time
/// inspection step (spec.md §3 "Block definition", §4.5).
pub fn declared_block_def(kind: &'static str, block: &mut dyn Block) -> BlockDef {
    let mut builder = BlockBuilder::new();
    block.setup(&mut builder);
    builder.finish(kind).0
}

/// The plug-in contract (spec.md §6.3), grounded on `BlockInterface`
/// in `st/blocks/blocks.go` and restated as idiomatic async Rust:
/// `setup` declares routes once, single-threaded, before `run` starts
/// concurrently with the multiplexer.
#[async_trait]
pub trait Block: Send {
    /// The registry key this plug-in is instantiated under.
    fn kind(&self) -> &'static str;

    /// Declares this block's routes. Called exactly once, before `run`.
    fn setup(&mut self, ctl: &mut BlockBuilder);

    /// The plug-in's domain loop. Takes ownership since nothing else
    /// needs the block instance once `run` is underway.
    async fn run(self: Box<Self>, ctl: RunHandles);
}

/// Spawns a block's multiplexer and plug-in task, returning the
/// manager-facing control channels, the block's declared [`BlockDef`],
/// and a handle that completes once both tasks have exited (i.e. after
/// `QuitChan`).
pub fn spawn_block(id: BlockId, log: LogBus, mut block: Box<dyn Block>) -> (BlockChans, BlockDef, JoinHandle<()>) {
    let kind = block.kind();
    let mut builder = BlockBuilder::new();
    block.setup(&mut builder);
    let (def, ports) = builder.finish(kind);

    let (chans, rx) = block_chans();
    let (plugin_quit_tx, plugin_quit_rx) = oneshot::channel();
    let run_handles = RunHandles { id: id.clone(), log: log.clone(), quit: plugin_quit_rx };

    let plugin_task = tokio::spawn(async move { block.run(run_handles).await });
    let mux_task = tokio::spawn(run_multiplexer(id, log, ports, rx, plugin_quit_tx));

    let handle = tokio::spawn(async move {
        let _ = tokio::join!(plugin_task, mux_task);
    });

    (chans, def, handle)
}

async fn run_multiplexer(
    id: BlockId,
    log: LogBus,
    mut ports: MultiplexerPorts,
    mut rx: BlockChanReceivers,
    plugin_quit: oneshot::Sender<()>,
) {
    let mut fanout: HashMap<String, mpsc::Sender<Msg>> = HashMap::new();
    let mut plugin_quit = Some(plugin_quit);

    loop {
        tokio::select! {
            Some(msg) = rx.in_rx.recv() => {
                dispatch_in(&id, &log, &ports.in_routes, msg);
            }
            Some(query) = rx.query_rx.recv() => {
                dispatch_query(&id, &log, &ports.query_routes, query);
            }
            Some(add) = rx.add_rx.recv() => {
                fanout.insert(add.route, add.channel);
            }
            Some(route) = rx.del_rx.recv() => {
                fanout.remove(&route);
            }
            Some(msg) = recv_optional(&mut ports.broadcast_rx) => {
                for target in fanout.values() {
                    let _ = target.send(msg.clone()).await;
                }
            }
            Some(()) = rx.quit_rx.recv() => {
                log.info(id.as_str(), json!(format!("Block {id} Quitting...")));
                if let Some(tx) = plugin_quit.take() {
                    let _ = tx.send(());
                }
                break;
            }
        }
    }
}

/// Awaits a possibly-absent receiver without ever resolving when it's
/// `None`, so a non-broadcasting block's fan-out arm simply never fires.
async fn recv_optional(rx: &mut Option<mpsc::Receiver<Msg>>) -> Option<Msg> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

fn dispatch_in(id: &BlockId, log: &LogBus, in_routes: &HashMap<String, mpsc::Sender<Msg>>, msg: Msg) {
    let Some(tx) = in_routes.get(&msg.route) else {
        return;
    };
    if msg.route == "rule" {
        log.ui(id.as_str(), LogKind::RuleUpdated, msg.payload.clone());
    }
    if tx.try_send(msg).is_err() {
        log.error(id.as_str(), json!("critical: block is dropping messages"));
    }
}

fn dispatch_query(id: &BlockId, log: &LogBus, query_routes: &HashMap<String, mpsc::Sender<QueryMsg>>, query: QueryMsg) {
    let Some(tx) = query_routes.get(&query.route) else {
        let _ = query.reply.send(json!({"error": "unknown route"}));
        return;
    };
    let route = query.route.clone();
    if let Err(err) = tx.try_send(query) {
        log.error(id.as_str(), json!(format!("critical: block is dropping queries on route {route}")));
        let reply = match err {
            mpsc::error::TrySendError::Full(q) => q.reply,
            mpsc::error::TrySendError::Closed(q) => q.reply,
        };
        let _ = reply.send(json!({"error": "block has timed out"}));
    }
}

#[cfg(test)]
#[path = "block_tests.rs"]
mod tests;
