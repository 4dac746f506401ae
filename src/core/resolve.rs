//! Purpose: Apply one path segment to one JSON value.
//! Exports: `Outcome`, `resolve`, `kind_name`.
//! Role: Type-dependent dispatch over the closed set of JSON variants.
//! Invariants: Resolution never fails; every failure returns the input as a fallback.
//! Invariants: The input tree is never mutated; selections borrow, slices allocate.
use std::borrow::Cow;

use serde_json::Value;

use crate::core::diag::Warning;
use crate::core::token::{SegmentKind, SliceBounds, classify, normalize_index};

/// Result of applying a single segment.
#[derive(Debug, PartialEq)]
pub enum Outcome<'a> {
    Resolved(Cow<'a, Value>),
    /// The segment did not apply; `value` is the unchanged input.
    Fallback { value: &'a Value, warning: Warning },
}

impl<'a> Outcome<'a> {
    pub fn value(&self) -> &Value {
        match self {
            Outcome::Resolved(value) => value,
            Outcome::Fallback { value, .. } => value,
        }
    }

    pub fn warning(&self) -> Option<&Warning> {
        match self {
            Outcome::Resolved(_) => None,
            Outcome::Fallback { warning, .. } => Some(warning),
        }
    }

    pub fn into_parts(self) -> (Cow<'a, Value>, Option<Warning>) {
        match self {
            Outcome::Resolved(value) => (value, None),
            Outcome::Fallback { value, warning } => (Cow::Borrowed(value), Some(warning)),
        }
    }
}

pub fn resolve<'a>(value: &'a Value, segment: &str) -> Outcome<'a> {
    match value {
        Value::Object(map) => match map.get(segment) {
            Some(found) => Outcome::Resolved(Cow::Borrowed(found)),
            None => Outcome::Fallback {
                value,
                warning: Warning::KeyNotPresent {
                    key: segment.to_string(),
                },
            },
        },
        Value::Array(items) => resolve_sequence(value, Sequence::Items(items), segment),
        Value::String(text) => resolve_sequence(value, Sequence::Text(text), segment),
        Value::Null | Value::Bool(_) | Value::Number(_) => Outcome::Fallback {
            value,
            warning: Warning::AtomicValue {
                segment: segment.to_string(),
                kind: kind_name(value),
            },
        },
    }
}

pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Clone, Copy)]
enum Sequence<'a> {
    Items(&'a [Value]),
    Text(&'a str),
}

impl<'a> Sequence<'a> {
    fn len(self) -> usize {
        match self {
            Sequence::Items(items) => items.len(),
            Sequence::Text(text) => text.chars().count(),
        }
    }

    fn item(self, index: usize) -> Option<Cow<'a, Value>> {
        match self {
            Sequence::Items(items) => items.get(index).map(Cow::Borrowed),
            Sequence::Text(text) => text
                .chars()
                .nth(index)
                .map(|ch| Cow::Owned(Value::String(ch.to_string()))),
        }
    }

    fn slice(self, bounds: SliceBounds) -> Value {
        let (start, stop) = bounds.range(self.len());
        match self {
            Sequence::Items(items) => Value::Array(items[start..stop].to_vec()),
            Sequence::Text(text) => {
                Value::String(text.chars().skip(start).take(stop - start).collect())
            }
        }
    }
}

fn resolve_sequence<'a>(value: &'a Value, seq: Sequence<'a>, segment: &str) -> Outcome<'a> {
    let warning = match classify(segment) {
        SegmentKind::Index(index) => {
            let len = seq.len();
            match normalize_index(index, len).and_then(|idx| seq.item(idx)) {
                Some(item) => return Outcome::Resolved(item),
                None => Warning::IndexOutOfRange { index, len },
            }
        }
        SegmentKind::Slice(bounds) if bounds.is_identity() => {
            return Outcome::Resolved(Cow::Borrowed(value));
        }
        SegmentKind::Slice(bounds) => return Outcome::Resolved(Cow::Owned(seq.slice(bounds))),
        SegmentKind::InvalidSlice => Warning::InvalidSlice {
            segment: segment.to_string(),
        },
        SegmentKind::Key => Warning::InvalidIndex {
            segment: segment.to_string(),
        },
    };
    Outcome::Fallback { value, warning }
}
