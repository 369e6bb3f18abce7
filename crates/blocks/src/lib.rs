// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! streamtools-blocks: the built-in plug-in library (spec.md §4.5).
//!
//! Real I/O block kinds (HTTP sources, NSQ, database sinks) are out of
//! scope per spec.md §1; these are the in-scope "plumbing" kinds the
//! original ships alongside its I/O kinds, reimagined for
//! `serde_json::Value` payloads: a passthrough, a last-value store, a
//! counter, a log sink, and a rule-configurable filter. Each is a
//! worked example of the [`streamtools_runtime::Block`] interface and
//! feeds the end-to-end scenarios in spec.md §8.

pub mod count;
pub mod filter;
pub mod identity;
pub mod record;
pub mod tolog;

#[cfg(feature = "test-support")]
pub mod test_support;
