// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-wide log/UI bus record types (spec.md §6).
//!
//! The original routes these through two package-level channels,
//! `loghub.Log` and `loghub.UI`. Here the bus is an explicit,
//! injectable handle instead of a global — consistent with how the
//! teacher workspace threads shared state through `RuntimeDeps`/
//! `ListenCtx` rather than statics.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// The kind of record published to the log or UI bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogKind {
    Info,
    Error,
    RuleUpdated,
    UpdateRate,
}

/// A single record on the log or UI bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub kind: LogKind,
    pub data: serde_json::Value,
    pub id: String,
}

/// Handle for publishing to the log and UI streams.
///
/// Cloning is cheap and intentional: every block task and connection
/// task holds its own clone, mirroring the original's tolerance for
/// multiple producers on `loghub.Log`/`loghub.UI`.
#[derive(Clone)]
pub struct LogBus {
    log_tx: mpsc::UnboundedSender<LogRecord>,
    ui_tx: mpsc::UnboundedSender<LogRecord>,
}

impl LogBus {
    /// Create a new bus, returning the handle plus the two receiver
    /// ends. Consumers of `log_rx`/`ui_rx` (a file writer, a metrics
    /// sink, a UI push channel) are out of scope for this crate
    /// (spec.md §1); a caller who doesn't want to consume them may
    /// simply drop the receivers.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<LogRecord>, mpsc::UnboundedReceiver<LogRecord>) {
        let (log_tx, log_rx) = mpsc::unbounded_channel();
        let (ui_tx, ui_rx) = mpsc::unbounded_channel();
        (Self { log_tx, ui_tx }, log_rx, ui_rx)
    }

    /// Publish a record to the `Log` stream, tracing it at the level
    /// matching its kind so the system is never silent even with no
    /// bus consumer attached.
    pub fn log(&self, id: &str, kind: LogKind, data: serde_json::Value) {
        match kind {
            LogKind::Error => tracing::error!(block_id = id, data = %data, "block error"),
            _ => tracing::info!(block_id = id, data = %data, "block log"),
        }
        let _ = self.log_tx.send(LogRecord { kind, data, id: id.to_string() });
    }

    /// Publish a record to the `UI` stream (rule changes, rate updates).
    pub fn ui(&self, id: &str, kind: LogKind, data: serde_json::Value) {
        tracing::debug!(block_id = id, kind = ?kind, data = %data, "ui event");
        let _ = self.ui_tx.send(LogRecord { kind, data, id: id.to_string() });
    }

    pub fn info(&self, id: &str, data: impl Into<serde_json::Value>) {
        self.log(id, LogKind::Info, data.into());
    }

    pub fn error(&self, id: &str, data: impl Into<serde_json::Value>) {
        self.log(id, LogKind::Error, data.into());
    }
}

impl Default for LogBus {
    fn default() -> Self {
        Self::new().0
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
