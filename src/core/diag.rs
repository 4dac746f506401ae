//! Purpose: Model recoverable resolution warnings and the sink that receives them.
//! Exports: `Warning`, `DiagnosticSink`, `Collect`.
//! Role: Side channel for per-segment failures; resolution itself always yields a value.
//! Invariants: Sinks are passed explicitly; nothing here touches process-wide state.
//! Invariants: Warnings never alter the value a walk returns.
use std::fmt;

use crate::core::convert::Conversion;
use crate::core::pattern::Pattern;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    IndexOutOfRange { index: i64, len: usize },
    InvalidIndex { segment: String },
    InvalidSlice { segment: String },
    KeyNotPresent { key: String },
    AtomicValue { segment: String, kind: &'static str },
    ConversionFailed { conversion: Conversion, value: String },
    UnknownConversion { tag: String },
}

impl Warning {
    /// Stable machine-readable label, used in JSON notices.
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::IndexOutOfRange { .. } => "index-out-of-range",
            Warning::InvalidIndex { .. } => "invalid-index",
            Warning::InvalidSlice { .. } => "invalid-slice",
            Warning::KeyNotPresent { .. } => "key-not-present",
            Warning::AtomicValue { .. } => "atomic-value",
            Warning::ConversionFailed { .. } => "conversion-failed",
            Warning::UnknownConversion { .. } => "unknown-conversion",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::IndexOutOfRange { index, len } => {
                write!(f, "index {index} outside [0, {len})")
            }
            Warning::InvalidIndex { segment } => {
                write!(f, "invalid index {segment:?}; must be numeric or slice")
            }
            Warning::InvalidSlice { segment } => {
                write!(f, "invalid slice {segment:?}; bounds must be numeric or empty")
            }
            Warning::KeyNotPresent { key } => write!(f, "key {key:?} not present"),
            Warning::AtomicValue { segment, kind } => {
                write!(f, "cannot index atomic value ({kind}) with {segment:?}")
            }
            Warning::ConversionFailed { conversion, value } => {
                write!(f, "cannot convert {value} with {}", conversion.name())
            }
            Warning::UnknownConversion { tag } => {
                write!(f, "unknown conversion {tag:?}; expected i/int, f/float or r/repr")
            }
        }
    }
}

/// Receives warnings emitted while walking a pattern.
pub trait DiagnosticSink {
    fn warning(&mut self, warning: Warning);

    /// Called before each pattern of a multi-pattern lookup is walked.
    fn enter_pattern(&mut self, _pattern: &Pattern) {}
}

impl DiagnosticSink for Vec<Warning> {
    fn warning(&mut self, warning: Warning) {
        self.push(warning);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn warning(&mut self, warning: Warning) {
        (**self).warning(warning);
    }

    fn enter_pattern(&mut self, pattern: &Pattern) {
        (**self).enter_pattern(pattern);
    }
}

/// Buffering sink with an optional cap, useful when the caller only wants the first few.
#[derive(Clone, Debug, Default)]
pub struct Collect {
    warnings: Vec<Warning>,
    limit: Option<usize>,
    dropped: usize,
}

impl Collect {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of warnings discarded because the limit was reached.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.dropped == 0
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

impl DiagnosticSink for Collect {
    fn warning(&mut self, warning: Warning) {
        match self.limit {
            Some(limit) if self.warnings.len() >= limit => self.dropped += 1,
            _ => self.warnings.push(warning),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Collect, DiagnosticSink, Warning};

    #[test]
    fn messages_name_the_failure() {
        let warning = Warning::IndexOutOfRange { index: 99, len: 2 };
        assert_eq!(warning.to_string(), "index 99 outside [0, 2)");

        let warning = Warning::KeyNotPresent {
            key: "missing".to_string(),
        };
        assert_eq!(warning.to_string(), "key \"missing\" not present");
        assert_eq!(warning.kind(), "key-not-present");
    }

    #[test]
    fn collect_respects_limit() {
        let mut sink = Collect::with_limit(1);
        sink.warning(Warning::InvalidIndex {
            segment: "a".to_string(),
        });
        sink.warning(Warning::InvalidIndex {
            segment: "b".to_string(),
        });
        assert_eq!(sink.warnings().len(), 1);
        assert_eq!(sink.dropped(), 1);
        assert!(!sink.is_empty());
        assert_eq!(
            sink.into_warnings(),
            vec![Warning::InvalidIndex {
                segment: "a".to_string()
            }]
        );
    }

    #[test]
    fn vec_and_mut_ref_are_sinks() {
        fn emit<S: DiagnosticSink>(mut sink: S) {
            sink.warning(Warning::UnknownConversion {
                tag: "x".to_string(),
            });
        }

        let mut warnings: Vec<Warning> = Vec::new();
        emit(&mut warnings);
        emit(&mut warnings);
        assert_eq!(warnings.len(), 2);
    }
}
