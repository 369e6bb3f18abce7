// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn fake_clock_advances_by_exact_duration() {
    let clock = FakeClock::new();
    let start = clock.now_ns();
    clock.advance(Duration::from_millis(200));
    assert_eq!(clock.now_ns() - start, 200_000_000);
}

#[test]
fn fake_clock_set_ns_is_absolute() {
    let clock = FakeClock::new();
    clock.set_ns(42);
    assert_eq!(clock.now_ns(), 42);
}

#[test]
fn system_clock_is_monotonic_enough_for_successive_reads() {
    let clock = SystemClock;
    let a = clock.now_ns();
    let b = clock.now_ns();
    assert!(b >= a);
}
