//! Purpose: Define a stable, structured schema for resolution warnings on stderr.
//! Exports: `Notice`, `notice_json`.
//! Role: Shared contract helper for CLI diagnostics (non-fatal events).
//! Invariants: Notices are non-fatal and never alter stdout payloads.
//! Invariants: JSON schema is stable once published; fields are additive-only.
use serde_json::{Map, Value, json};

use crate::core::diag::Warning;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: String,
    pub message: String,
    pub pattern: String,
    pub input: String,
}

impl Notice {
    pub fn from_warning(warning: &Warning, pattern: &str, input: &str) -> Self {
        Self {
            kind: warning.kind().to_string(),
            message: warning.to_string(),
            pattern: pattern.to_string(),
            input: input.to_string(),
        }
    }
}

pub fn notice_json(notice: &Notice) -> Value {
    let mut inner = Map::new();
    inner.insert("kind".to_string(), json!(notice.kind));
    inner.insert("message".to_string(), json!(notice.message));
    inner.insert("pattern".to_string(), json!(notice.pattern));
    inner.insert("input".to_string(), json!(notice.input));

    let mut outer = Map::new();
    outer.insert("warning".to_string(), Value::Object(inner));
    Value::Object(outer)
}
