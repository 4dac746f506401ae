//! Purpose: Decode input documents and describe where decoding failed.
//! Exports: `from_str`, `DecodeFailure`, `ParseFailureCategory`, `categorize_error`, `byte_offset`.
//! Role: Parser boundary over serde_json; maps line/column errors to byte offsets.
//! Invariants: Offsets always lie within the input and on a character boundary.
//! Invariants: Object key order is preserved (serde_json `preserve_order`).
//! Notes: Rendering the failure context is left to callers so presentation stays explicit.

use serde_json::Value;
use serde_json::error::Category;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    Eof,
    Data,
    Io,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Data => "data",
            ParseFailureCategory::Io => "io",
        }
    }

    pub(crate) fn hint(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => {
                "Check the marked position for a missing or unexpected character."
            }
            ParseFailureCategory::Eof => {
                "Input ended early; look for an unclosed string, array, or object."
            }
            ParseFailureCategory::Data => "The JSON is well-formed but holds an unsupported value.",
            ParseFailureCategory::Io => "The input could not be read completely.",
        }
    }
}

#[derive(Debug)]
pub(crate) struct DecodeFailure {
    pub(crate) error: serde_json::Error,
    pub(crate) offset: usize,
}

impl DecodeFailure {
    pub(crate) fn category(&self) -> ParseFailureCategory {
        categorize_error(&self.error)
    }

    pub(crate) fn line(&self) -> usize {
        self.error.line()
    }

    pub(crate) fn column(&self) -> usize {
        self.error.column()
    }
}

pub(crate) fn from_str(input: &str) -> Result<Value, DecodeFailure> {
    serde_json::from_str(input).map_err(|error| {
        let offset = if error.is_eof() {
            input.len()
        } else {
            byte_offset(input, error.line(), error.column())
        };
        DecodeFailure { error, offset }
    })
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Syntax => ParseFailureCategory::Syntax,
        Category::Eof => ParseFailureCategory::Eof,
        Category::Data => ParseFailureCategory::Data,
        Category::Io => ParseFailureCategory::Io,
    }
}

/// Convert serde_json's one-based line and column into a byte offset of the
/// offending character.
pub(crate) fn byte_offset(input: &str, line: usize, column: usize) -> usize {
    let line_start: usize = input
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let mut offset = (line_start + column.saturating_sub(1)).min(input.len());
    while !input.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
