// Core modules: pattern grammar, resolution, conversions, diagnostics and errors.
pub mod convert;
pub mod diag;
pub mod error;
pub mod highlight;
pub mod lookup;
pub mod pattern;
pub mod resolve;
pub mod token;
pub mod walk;
