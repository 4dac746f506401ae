//! Purpose: Run several patterns against one document and shape the combined result.
//! Exports: `Lookup`, `lookup_all`.
//! Role: The only caller of the walker on behalf of the CLI.
//! Invariants: Results keep pattern order; one pattern yields the bare result.
//! Invariants: A join separator always produces a single JSON string.
use serde_json::Value;
use tracing::debug;

use crate::core::diag::DiagnosticSink;
use crate::core::pattern::{Dialect, Pattern};
use crate::core::walk::walk;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lookup {
    patterns: Vec<Pattern>,
    join: Option<String>,
}

impl Lookup {
    pub fn new<I, P>(raw: I, dialect: Dialect) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        Self {
            patterns: raw
                .into_iter()
                .map(|raw| Pattern::parse_with(raw.as_ref(), dialect))
                .collect(),
            join: None,
        }
    }

    pub fn with_join(mut self, separator: impl Into<String>) -> Self {
        self.join = Some(separator.into());
        self
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    pub fn run<S>(&self, value: &Value, sink: &mut S) -> Value
    where
        S: DiagnosticSink + ?Sized,
    {
        lookup_all(value, &self.patterns, self.join.as_deref(), sink)
    }
}

/// With no patterns the document itself is the result.
pub fn lookup_all<S>(value: &Value, patterns: &[Pattern], join: Option<&str>, sink: &mut S) -> Value
where
    S: DiagnosticSink + ?Sized,
{
    if patterns.is_empty() && join.is_none() {
        return value.clone();
    }
    let mut results = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        sink.enter_pattern(pattern);
        debug!(pattern = %pattern, steps = pattern.steps().len(), "walking pattern");
        results.push(walk(value, pattern, sink));
    }

    if let Some(separator) = join {
        let parts: Vec<String> = if patterns.is_empty() {
            vec![join_text(value)]
        } else {
            results.iter().map(join_text).collect()
        };
        return Value::String(parts.join(separator));
    }
    if results.len() == 1 {
        return results.pop().unwrap_or(Value::Null);
    }
    Value::Array(results)
}

fn join_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
