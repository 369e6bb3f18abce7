// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! The connection routine's rate estimate (spec.md §4.2) is defined
//! purely in terms of nanosecond timestamp differences, so the clock
//! trait exposes exactly that rather than the `Instant`/epoch-ms pair
//! a wall-clock-oriented system would want.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A clock that provides the current time as nanoseconds.
///
/// Object-safe by design (no `Clone` supertrait) so callers share one
/// through `Arc<dyn Clock>` rather than cloning the clock itself.
pub trait Clock: Send + Sync + 'static {
    fn now_ns(&self) -> i64;
}

/// Real system clock, backed by `SystemTime`.
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ns(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos() as i64
    }
}

/// Fake clock for deterministic tests: starts at a fixed instant and
/// only advances when told to.
#[derive(Clone)]
pub struct FakeClock {
    now_ns: Arc<AtomicI64>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self { now_ns: Arc::new(AtomicI64::new(1_000_000_000)) }
    }

    pub fn advance(&self, d: Duration) {
        self.now_ns.fetch_add(d.as_nanos() as i64, Ordering::SeqCst);
    }

    pub fn set_ns(&self, ns: i64) {
        self.now_ns.store(ns, Ordering::SeqCst);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now_ns(&self) -> i64 {
        self.now_ns.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
