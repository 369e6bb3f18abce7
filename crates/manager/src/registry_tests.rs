// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use streamtools_runtime::{BlockBuilder, RunHandles};

struct PingBlock;

#[async_trait]
impl Block for PingBlock {
    fn kind(&self) -> &'static str {
        "test-ping"
    }

    fn setup(&mut self, ctl: &mut BlockBuilder) {
        ctl.in_route("in");
        ctl.query_route("rule");
        ctl.broadcast();
    }

    async fn run(self: Box<Self>, ctl: RunHandles) {
        let _ = ctl.quit.await;
    }
}

fn ping_factory() -> Box<dyn Block> {
    Box::new(PingBlock)
}

#[test]
fn register_captures_the_declared_def() {
    let mut lib = BlockLibrary::new();
    lib.register("test-ping", ping_factory);

    assert!(lib.contains("test-ping"));
    let def = lib.def("test-ping").expect("def must be captured");
    assert!(def.declares_in_route("in"));
    assert!(def.declares_query_route("rule"));
    assert!(def.out_routes.contains("out"));
}

#[test]
fn unknown_kind_is_not_present() {
    let lib = BlockLibrary::new();
    assert!(!lib.contains("nope"));
    assert!(lib.def("nope").is_none());
    assert!(lib.create("nope").is_none());
}

#[test]
fn create_produces_a_fresh_instance_each_time() {
    let mut lib = BlockLibrary::new();
    lib.register("test-ping", ping_factory);

    let a = lib.create("test-ping").unwrap();
    let b = lib.create("test-ping").unwrap();
    assert_eq!(a.kind(), "test-ping");
    assert_eq!(b.kind(), "test-ping");
}

#[test]
#[should_panic(expected = "registered twice")]
fn registering_the_same_kind_twice_panics() {
    let mut lib = BlockLibrary::new();
    lib.register("test-ping", ping_factory);
    lib.register("test-ping", ping_factory);
}
