// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The block manager: the graph orchestrator (spec.md §4.3), grounded
//! on `BlockManager` in `st/server/blockmanager.go`. One mutex-guarded
//! state struct (`blocks`, `connections`) behind `lock_state`/
//! `lock_state_mut` helpers, following the teacher's `Runtime`
//! locking convention in `engine/runtime/mod.rs`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::json;
use streamtools_core::{is_safe_id, BlockId, Clock, ConnectionId, IdGen, LogBus, Msg, Position, SequentialIdGen};
use streamtools_runtime::{
    spawn_block, spawn_connection, AddChanMsg, BlockChans, ConnectionChans, ConnectionQuery, QueryMsg,
};
use streamtools_wire::{
    BlockDef, BlockInfo, BlockStatus, ConnectionInfo, CreateBlockRequest, CreateConnectionRequest, StatusReport,
};
use tokio::sync::oneshot;

use crate::error::ManagerError;
use crate::registry::BlockLibrary;

/// Timeout for `Query`/`QueryConnection` (spec.md §4.3/§7).
const QUERY_TIMEOUT: Duration = Duration::from_secs(1);
/// Per-block ping timeout for `StatusBlocks` (spec.md §4.3).
const STATUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Manager-side record of a running block: the snapshot fields the
/// management API exposes plus the control channels only the manager
/// may send on (spec.md §3 `BlockChans` ownership split).
struct BlockRecord {
    kind: String,
    rule: serde_json::Value,
    position: Position,
    def: BlockDef,
    chans: BlockChans,
}

/// Manager-side record of a running connection.
struct ConnectionRecord {
    from_id: BlockId,
    to_id: BlockId,
    to_route: String,
    chans: ConnectionChans,
}

#[derive(Default)]
struct State {
    blocks: HashMap<BlockId, BlockRecord>,
    connections: HashMap<ConnectionId, ConnectionRecord>,
}

impl State {
    fn id_in_use(&self, id: &str) -> bool {
        self.blocks.contains_key(id) || self.connections.contains_key(id)
    }
}

/// The graph orchestrator. Owns the ID generator and the plug-in
/// registry; every topology mutation goes through its methods
/// (spec.md §4.3, §5 "shared-resource policy").
pub struct BlockManager {
    state: Mutex<State>,
    id_gen: SequentialIdGen,
    library: BlockLibrary,
    log: LogBus,
    clock: Arc<dyn Clock>,
}

impl BlockManager {
    pub fn new(library: BlockLibrary, log: LogBus, clock: Arc<dyn Clock>) -> Self {
        Self { state: Mutex::new(State::default()), id_gen: SequentialIdGen::new(), library, log, clock }
    }

    /// Draws ids from `id_gen` until one is unused by either map
    /// (spec.md §4.4), retrying past any id a caller pre-seeded.
    fn next_free_id(&self, state: &State) -> String {
        loop {
            let candidate = self.id_gen.next();
            if !state.id_in_use(&candidate) {
                return candidate;
            }
        }
    }

    // ---- Create -----------------------------------------------------

    pub async fn create(&self, req: Option<CreateBlockRequest>) -> Result<BlockInfo, ManagerError> {
        let req = req.ok_or_else(|| ManagerError::InvalidArgument("missing block info".into()))?;

        if !req.id.is_empty() && !is_safe_id(&req.id) {
            return Err(ManagerError::InvalidArgument(format!("unsafe id {:?}", req.id)));
        }
        if !self.library.contains(&req.kind) {
            return Err(ManagerError::NotFound(format!("kind {:?}", req.kind)));
        }

        let id = {
            let state = self.state.lock();
            if req.id.is_empty() {
                self.next_free_id(&state)
            } else if state.id_in_use(&req.id) {
                return Err(ManagerError::Conflict(req.id.clone()));
            } else {
                req.id.clone()
            }
        };
        let id = BlockId::new(id);
        let position = req.position.unwrap_or_default();

        // `req.kind` was confirmed present in `self.library` above; the
        // registry is immutable after startup, so this can't miss.
        #[allow(clippy::expect_used)]
        let instance = self.library.create(&req.kind).expect("kind checked above");
        let (chans, def, _handle) = spawn_block(id.clone(), self.log.clone(), instance);

        let mut rule = serde_json::Value::Null;
        if let Some(supplied) = req.rule {
            let _ = chans.in_tx.send(Msg::new("rule", supplied.clone())).await;
            rule = supplied;
        } else if def.declares_query_route("rule") {
            if let Ok(value) = query_with_timeout(&chans.query_tx, "rule", QUERY_TIMEOUT).await {
                rule = value;
            }
        }

        let info = BlockInfo { id: id.clone(), kind: req.kind.clone(), rule: rule.clone(), position };
        self.state.lock().blocks.insert(
            id,
            BlockRecord { kind: req.kind, rule, position, def, chans },
        );
        Ok(info)
    }

    // ---- Connect ------------------------------------------------------

    pub async fn connect(&self, req: Option<CreateConnectionRequest>) -> Result<ConnectionInfo, ManagerError> {
        let req = req.ok_or_else(|| ManagerError::InvalidArgument("missing connection info".into()))?;

        if !req.id.is_empty() && !is_safe_id(&req.id) {
            return Err(ManagerError::InvalidArgument(format!("unsafe id {:?}", req.id)));
        }

        let (id, from_add_tx, to_in_tx) = {
            let state = self.state.lock();
            let from = state
                .blocks
                .get(req.from_id.as_str())
                .ok_or_else(|| ManagerError::NotFound(format!("block {:?}", req.from_id)))?;
            let to = state
                .blocks
                .get(req.to_id.as_str())
                .ok_or_else(|| ManagerError::NotFound(format!("block {:?}", req.to_id)))?;
            let from_add_tx = from.chans.add_tx.clone();
            let to_in_tx = to.chans.in_tx.clone();

            let id = if req.id.is_empty() {
                self.next_free_id(&state)
            } else if state.id_in_use(&req.id) {
                return Err(ManagerError::Conflict(req.id.clone()));
            } else {
                req.id.clone()
            };
            (id, from_add_tx, to_in_tx)
        };

        let conn_id = ConnectionId::new(id);
        let (chans, _handle) =
            spawn_connection(conn_id.clone(), req.to_route.clone(), self.clock.clone(), self.log.clone());

        // Register the connection as a fan-out target of the source
        // block, and the sink block's inbound channel as the
        // connection's sole fan-out target (spec.md §4.3 step 3-4).
        let _ = from_add_tx
            .send(AddChanMsg { route: conn_id.to_string(), channel: chans.in_tx.clone() })
            .await;
        let _ = chans
            .add_tx
            .send(AddChanMsg { route: req.to_id.clone(), channel: to_in_tx })
            .await;

        let from_id = BlockId::new(req.from_id);
        let to_id = BlockId::new(req.to_id);
        let info = ConnectionInfo {
            id: conn_id.clone(),
            from_id: from_id.clone(),
            to_id: to_id.clone(),
            to_route: req.to_route.clone(),
        };

        self.state.lock().connections.insert(
            conn_id,
            ConnectionRecord { from_id, to_id, to_route: req.to_route, chans },
        );
        Ok(info)
    }

    // ---- Send / Query -------------------------------------------------

    pub async fn send(&self, id: &str, route: &str, payload: serde_json::Value) -> Result<(), ManagerError> {
        let in_tx = {
            let state = self.state.lock();
            state
                .blocks
                .get(id)
                .map(|b| b.chans.in_tx.clone())
                .ok_or_else(|| ManagerError::NotFound(format!("block {id:?}")))?
        };
        let _ = in_tx.send(Msg::new(route, payload)).await;
        Ok(())
    }

    pub async fn query(&self, id: &str, route: &str) -> Result<serde_json::Value, ManagerError> {
        let query_tx = {
            let state = self.state.lock();
            state
                .blocks
                .get(id)
                .map(|b| b.chans.query_tx.clone())
                .ok_or_else(|| ManagerError::NotFound(format!("block {id:?}")))?
        };
        query_with_timeout(&query_tx, route, QUERY_TIMEOUT)
            .await
            .map_err(|_| ManagerError::Timeout(format!("query {id}/{route}")))
    }

    pub async fn query_connection(&self, id: &str, route: &str) -> Result<serde_json::Value, ManagerError> {
        let query_tx = {
            let state = self.state.lock();
            state
                .connections
                .get(id)
                .map(|c| c.chans.query_tx.clone())
                .ok_or_else(|| ManagerError::NotFound(format!("connection {id:?}")))?
        };
        let (reply_tx, reply_rx) = oneshot::channel();
        query_tx
            .send(ConnectionQuery { route: route.to_string(), reply: reply_tx })
            .await
            .map_err(|_| ManagerError::Timeout(format!("query {id}/{route}")))?;
        tokio::time::timeout(QUERY_TIMEOUT, reply_rx)
            .await
            .map_err(|_| ManagerError::Timeout(format!("query {id}/{route}")))?
            .map_err(|_| ManagerError::Timeout(format!("query {id}/{route}")))
    }

    // ---- Delete --------------------------------------------------------

    /// Cascading delete (spec.md §4.3): every connection touching `id`
    /// is torn down first, then the block itself. Returns the full
    /// list of deleted ids, connections before the block.
    pub async fn delete_block(&self, id: &str) -> Result<Vec<String>, ManagerError> {
        if !self.state.lock().blocks.contains_key(id) {
            return Err(ManagerError::NotFound(format!("block {id:?}")));
        }

        let touching: Vec<String> = {
            let state = self.state.lock();
            state
                .connections
                .iter()
                .filter(|(_, c)| c.from_id.as_str() == id || c.to_id.as_str() == id)
                .map(|(cid, _)| cid.to_string())
                .collect()
        };

        let mut deleted = Vec::with_capacity(touching.len() + 1);
        for cid in touching {
            self.delete_connection(&cid).await?;
            deleted.push(cid);
        }

        let quit_tx = {
            let mut state = self.state.lock();
            state.blocks.remove(id).map(|b| b.chans.quit_tx)
        };
        if let Some(quit_tx) = quit_tx {
            let _ = quit_tx.send(()).await;
        }
        deleted.push(id.to_string());
        Ok(deleted)
    }

    /// Tears down one connection: stops the source block from
    /// forwarding to it, quits its task, then drops the record
    /// (spec.md §4.3).
    pub async fn delete_connection(&self, id: &str) -> Result<(), ManagerError> {
        let (from_id, quit_tx) = {
            let state = self.state.lock();
            let conn = state
                .connections
                .get(id)
                .ok_or_else(|| ManagerError::NotFound(format!("connection {id:?}")))?;
            (conn.from_id.clone(), conn.chans.quit_tx.clone())
        };

        let from_del_tx = self.state.lock().blocks.get(from_id.as_str()).map(|b| b.chans.del_tx.clone());
        if let Some(del_tx) = from_del_tx {
            let _ = del_tx.send(id.to_string()).await;
        }
        let _ = quit_tx.send(()).await;
        self.state.lock().connections.remove(id);
        Ok(())
    }

    // ---- Status ----------------------------------------------------------

    /// Pings every block in parallel with a 5s timeout each, waiting
    /// for all probes before returning (spec.md §4.3).
    pub async fn status_blocks(&self) -> Vec<StatusReport> {
        let pings: Vec<(BlockId, tokio::sync::mpsc::Sender<QueryMsg>)> = {
            let state = self.state.lock();
            state.blocks.iter().map(|(id, b)| (id.clone(), b.chans.query_tx.clone())).collect()
        };

        let probes = pings.into_iter().map(|(id, query_tx)| async move {
            match query_with_timeout(&query_tx, "ping", STATUS_TIMEOUT).await {
                Ok(reply) => StatusReport { id, status: BlockStatus::Ok, reply },
                Err(()) => StatusReport { id, status: BlockStatus::TimedOut, reply: json!("TIMEOUT") },
            }
        });

        futures_join_all(probes).await
    }

    // ---- Listing / lookup ----------------------------------------------

    pub fn get_block(&self, id: &str) -> Option<BlockInfo> {
        let state = self.state.lock();
        let record = state.blocks.get(id)?;
        Some(BlockInfo {
            id: BlockId::new(id),
            kind: record.kind.clone(),
            rule: record.rule.clone(),
            position: record.position,
        })
    }

    pub fn get_connection(&self, id: &str) -> Option<ConnectionInfo> {
        let state = self.state.lock();
        let record = state.connections.get(id)?;
        Some(ConnectionInfo {
            id: ConnectionId::new(id),
            from_id: record.from_id.clone(),
            to_id: record.to_id.clone(),
            to_route: record.to_route.clone(),
        })
    }

    /// Refreshes a block's `rule` field by querying its `rule` route
    /// (if declared) and stamping the answer onto the stored record,
    /// mirroring the original's `updateRule` refresh on listing.
    pub async fn refresh_rule(&self, id: &str) {
        let (query_tx, declares_rule) = {
            let state = self.state.lock();
            let Some(record) = state.blocks.get(id) else { return };
            (record.chans.query_tx.clone(), record.def.declares_query_route("rule"))
        };
        if !declares_rule {
            return;
        }
        if let Ok(value) = query_with_timeout(&query_tx, "rule", QUERY_TIMEOUT).await {
            if let Some(record) = self.state.lock().blocks.get_mut(id) {
                record.rule = value;
            }
        }
    }

    pub async fn list_blocks(&self) -> Vec<BlockInfo> {
        let ids: Vec<String> = self.state.lock().blocks.keys().map(|id| id.to_string()).collect();
        for id in &ids {
            self.refresh_rule(id).await;
        }
        let state = self.state.lock();
        state
            .blocks
            .iter()
            .map(|(id, record)| BlockInfo {
                id: id.clone(),
                kind: record.kind.clone(),
                rule: record.rule.clone(),
                position: record.position,
            })
            .collect()
    }

    pub fn list_connections(&self) -> Vec<ConnectionInfo> {
        let state = self.state.lock();
        state
            .connections
            .iter()
            .map(|(id, record)| ConnectionInfo {
                id: id.clone(),
                from_id: record.from_id.clone(),
                to_id: record.to_id.clone(),
                to_route: record.to_route.clone(),
            })
            .collect()
    }

    /// Repositions a block's opaque UI metadata (spec.md §3 `position`),
    /// supplemented from the original's `UpdateBlock` — present in
    /// `blockmanager.go`, dropped by the distillation, not excluded by
    /// any Non-goal since `position` is already part of the data model.
    pub fn update_block_position(&self, id: &str, position: Position) -> Result<(), ManagerError> {
        let mut state = self.state.lock();
        let record = state.blocks.get_mut(id).ok_or_else(|| ManagerError::NotFound(format!("block {id:?}")))?;
        record.position = position;
        Ok(())
    }
}

/// Sends a query with a fresh reply channel and awaits it under
/// `timeout`, used by every `Query*`-shaped operation (spec.md §9:
/// "query timeouts must be implemented with a timer channel inside the
/// manager, not a deadline on the block").
async fn query_with_timeout(
    query_tx: &tokio::sync::mpsc::Sender<QueryMsg>,
    route: &str,
    timeout: Duration,
) -> Result<serde_json::Value, ()> {
    let (reply_tx, reply_rx) = oneshot::channel();
    query_tx.send(QueryMsg { route: route.to_string(), reply: reply_tx }).await.map_err(|_| ())?;
    tokio::time::timeout(timeout, reply_rx).await.map_err(|_| ())?.map_err(|_| ())
}

/// Runs a collection of futures to completion concurrently without
/// pulling in the `futures` crate for a single combinator: each probe
/// is spawned so a single slow ping can't delay the others past its
/// own timeout, then joined.
async fn futures_join_all<F, T>(futures: impl IntoIterator<Item = F>) -> Vec<T>
where
    F: std::future::Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    let handles: Vec<_> = futures.into_iter().map(tokio::spawn).collect();
    let mut out = Vec::with_capacity(handles.len());
    for handle in handles {
        if let Ok(value) = handle.await {
            out.push(value);
        }
    }
    out
}

#[cfg(test)]
#[path = "manager_tests/mod.rs"]
mod tests;
