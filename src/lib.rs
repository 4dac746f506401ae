//! Purpose: Library core behind the `jsonpick` CLI and its tests.
//! Exports: `core` (pattern parsing, resolution, conversions, highlighting, errors), `notice`.
//! Role: Pure, synchronous resolution over already-decoded `serde_json::Value` trees.
//! Invariants: Nothing in the library reads files, writes output, or holds global state.
//! Invariants: Per-segment failures surface as warnings through an explicit sink.
pub mod core;
pub mod notice;

pub use crate::core::diag::{DiagnosticSink, Warning};
pub use crate::core::lookup::Lookup;
pub use crate::core::pattern::{Dialect, Pattern};
pub use crate::core::walk::{walk, walk_str};
