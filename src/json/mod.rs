//! Purpose: JSON decoding boundary shared by the CLI input paths.
//! Exports: `parse` module with decode helpers and failure mapping.
//! Role: Single seam for parser details so callsites avoid ad hoc decode logic.
//! Invariants: Every input document is decoded through this module.
//! Invariants: Helper APIs stay small and deterministic (no hidden global state).

pub(crate) mod parse;
