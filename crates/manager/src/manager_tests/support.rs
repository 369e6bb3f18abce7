// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use streamtools_core::{Clock, FakeClock, LogBus};
use streamtools_wire::CreateBlockRequest;

use crate::manager::BlockManager;
use crate::registry::BlockLibrary;

/// A library with every built-in kind plus the `test-stall` synthetic
/// kind, wired the way a real binary would at startup (spec.md §4.5).
pub fn full_library() -> BlockLibrary {
    let mut lib = BlockLibrary::new();
    lib.register(streamtools_blocks::identity::KIND, streamtools_blocks::identity::factory);
    lib.register(streamtools_blocks::record::KIND, streamtools_blocks::record::factory);
    lib.register(streamtools_blocks::count::KIND, streamtools_blocks::count::factory);
    lib.register(streamtools_blocks::tolog::KIND, streamtools_blocks::tolog::factory);
    lib.register(streamtools_blocks::filter::KIND, streamtools_blocks::filter::factory);
    lib.register(streamtools_blocks::test_support::STALL_KIND, streamtools_blocks::test_support::stall_factory);
    lib
}

pub fn manager() -> BlockManager {
    let clock: Arc<dyn Clock> = Arc::new(FakeClock::new());
    let (log, _log_rx, _ui_rx) = LogBus::new();
    BlockManager::new(full_library(), log, clock)
}

pub fn block_req(id: &str, kind: &str) -> CreateBlockRequest {
    CreateBlockRequest { id: id.to_string(), kind: kind.to_string(), rule: None, position: None }
}
