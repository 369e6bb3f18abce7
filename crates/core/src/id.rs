// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! ID types and generation for the streaming dataflow graph.
//!
//! Unlike a fixed-prefix nanoid, graph IDs are user-suppliable strings:
//! a caller may name a block `"my-source"` as readily as let the manager
//! generate one. The only constraint is the "safe" rule below.

use std::sync::atomic::{AtomicU64, Ordering};

/// The one reserved ID that can never be assigned to a block or connection.
pub const RESERVED_ID: &str = "DAEMON";

/// Returns true iff `id` round-trips through percent-encoding unchanged
/// and is not the reserved string `DAEMON`.
///
/// This mirrors the original's `url.QueryEscape(id) == id` check: an id
/// is safe when it contains nothing a URL path segment would need to
/// escape.
pub fn is_safe_id(id: &str) -> bool {
    if id == RESERVED_ID {
        return false;
    }
    percent_encoding::percent_encode(id.as_bytes(), ID_ESCAPE).to_string() == id
}

/// Characters that `is_safe_id` allows unescaped, beyond ASCII alphanumerics.
const ID_ESCAPE: &percent_encoding::AsciiSet = &percent_encoding::NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Define a newtype ID wrapper around `String` with `Display`, `Deref`,
/// `Borrow<str>`, and the usual string conversions.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the ID type.
///     pub struct BlockId;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_id! {
    /// Identifier of a block record in the manager's `blockMap`.
    pub struct BlockId;
}

define_id! {
    /// Identifier of a connection record in the manager's `connMap`.
    pub struct ConnectionId;
}

/// Generates the next candidate ID for a newly-created block or connection.
///
/// Implementations need not guarantee uniqueness against the manager's
/// maps — the manager retries against a generator until it draws an id
/// that is not already present in either map (spec.md §4.4).
pub trait IdGen: Send + Sync {
    fn next(&self) -> String;
}

/// Monotonic decimal-string generator, starting at `"1"`, matching the
/// original's `IDService` goroutine. Implemented as a plain atomic
/// counter rather than a literal id-emitting task: Go reaches for a
/// goroutine-plus-channel because that is its only concurrency
/// primitive, but the same "next free id" contract is better served in
/// Rust by a `Send + Sync` counter any number of callers can share
/// without a round trip through a channel.
#[derive(Default)]
pub struct SequentialIdGen {
    next: AtomicU64,
}

impl SequentialIdGen {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        self.next.fetch_add(1, Ordering::Relaxed).to_string()
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
