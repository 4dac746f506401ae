//! Purpose: Resolve a parsed pattern against a JSON value, one step at a time.
//! Exports: `walk`, `walk_str`, `apply_step`.
//! Role: Drives the resolver and conversion stage; forwards warnings to the caller's sink.
//! Invariants: Always returns a value; a failing step continues from its input.
//! Invariants: Work is bounded by the step count of the pattern.
use std::borrow::Cow;

use serde_json::Value;
use tracing::trace;

use crate::core::convert::convert_tag;
use crate::core::diag::DiagnosticSink;
use crate::core::pattern::{Pattern, Step};
use crate::core::resolve::resolve;

pub fn walk<S>(value: &Value, pattern: &Pattern, sink: &mut S) -> Value
where
    S: DiagnosticSink + ?Sized,
{
    let mut current = Cow::Borrowed(value);
    for (depth, step) in pattern.steps().iter().enumerate() {
        trace!(pattern = %pattern, depth, segment = %step.segment, "resolving step");
        current = apply_step(current, step, sink);
    }
    current.into_owned()
}

/// Parse `raw` with the default dialect and walk it.
pub fn walk_str<S>(value: &Value, raw: &str, sink: &mut S) -> Value
where
    S: DiagnosticSink + ?Sized,
{
    walk(value, &Pattern::parse(raw), sink)
}

/// Resolve one step, then apply its conversion tag if it has one.
pub fn apply_step<'a, S>(current: Cow<'a, Value>, step: &Step, sink: &mut S) -> Cow<'a, Value>
where
    S: DiagnosticSink + ?Sized,
{
    let next = match current {
        Cow::Borrowed(value) => {
            let (next, warning) = resolve(value, &step.segment).into_parts();
            if let Some(warning) = warning {
                sink.warning(warning);
            }
            next
        }
        Cow::Owned(value) => {
            let (next, warning) = resolve(&value, &step.segment).into_parts();
            if let Some(warning) = warning {
                sink.warning(warning);
            }
            Cow::Owned(next.into_owned())
        }
    };
    match &step.conversion {
        Some(tag) => convert_tag(next, tag, sink),
        None => next,
    }
}
