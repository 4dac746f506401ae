//! Purpose: Render result JSON with configurable layout and optional ANSI colorization.
//! Exports: RenderOptions, render_json.
//! Role: Small, pure formatter used by CLI emission paths.
//! Invariants: With color off and indent 2, output equals serde_json::to_string_pretty.
//! Invariants: With color off and no indent, output equals serde_json::to_string.
//! Invariants: ANSI escapes appear only when explicitly enabled.
use serde_json::Value;

// Conservative 8/16-color palette for broad terminal compatibility.
// Avoid bright variants that can lose contrast on themes like Solarized.
const COLOR_KEY: &str = "36";
const COLOR_STRING: &str = "32";
const COLOR_NUMBER: &str = "33";
const COLOR_BOOL: &str = "35";
const COLOR_NULL: &str = "39";
const COLOR_PUNCT: &str = "39";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level; `None` renders on a single line.
    pub indent: Option<usize>,
    pub sort_keys: bool,
    pub color: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: Some(2),
            sort_keys: false,
            color: false,
        }
    }
}

pub fn render_json(value: &Value, options: &RenderOptions) -> String {
    let mut out = String::new();
    write_value(value, 0, options, &mut out);
    out
}

fn write_value(value: &Value, level: usize, options: &RenderOptions, out: &mut String) {
    match value {
        Value::Null => push_colored("null", COLOR_NULL, options.color, out),
        Value::Bool(val) => {
            let text = if *val { "true" } else { "false" };
            push_colored(text, COLOR_BOOL, options.color, out);
        }
        Value::Number(num) => push_colored(&num.to_string(), COLOR_NUMBER, options.color, out),
        Value::String(text) => push_colored(&encode_str(text), COLOR_STRING, options.color, out),
        Value::Array(items) => write_array(items, level, options, out),
        Value::Object(map) => write_object(map, level, options, out),
    }
}

fn write_array(items: &[Value], level: usize, options: &RenderOptions, out: &mut String) {
    if items.is_empty() {
        push_colored("[]", COLOR_PUNCT, options.color, out);
        return;
    }
    push_colored("[", COLOR_PUNCT, options.color, out);
    for (idx, item) in items.iter().enumerate() {
        push_newline(level + 1, options, out);
        write_value(item, level + 1, options, out);
        if idx + 1 < items.len() {
            push_colored(",", COLOR_PUNCT, options.color, out);
        }
    }
    push_newline(level, options, out);
    push_colored("]", COLOR_PUNCT, options.color, out);
}

fn write_object(
    map: &serde_json::Map<String, Value>,
    level: usize,
    options: &RenderOptions,
    out: &mut String,
) {
    if map.is_empty() {
        push_colored("{}", COLOR_PUNCT, options.color, out);
        return;
    }
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    if options.sort_keys {
        entries.sort_by(|a, b| a.0.cmp(b.0));
    }
    push_colored("{", COLOR_PUNCT, options.color, out);
    let len = entries.len();
    for (idx, (key, value)) in entries.into_iter().enumerate() {
        push_newline(level + 1, options, out);
        push_colored(&encode_str(key), COLOR_KEY, options.color, out);
        push_colored(":", COLOR_PUNCT, options.color, out);
        if options.indent.is_some() {
            out.push(' ');
        }
        write_value(value, level + 1, options, out);
        if idx + 1 < len {
            push_colored(",", COLOR_PUNCT, options.color, out);
        }
    }
    push_newline(level, options, out);
    push_colored("}", COLOR_PUNCT, options.color, out);
}

fn encode_str(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| "\"\"".to_string())
}

fn push_newline(level: usize, options: &RenderOptions, out: &mut String) {
    let Some(width) = options.indent else {
        return;
    };
    out.push('\n');
    for _ in 0..level * width {
        out.push(' ');
    }
}

fn push_colored(text: &str, color: &str, use_color: bool, out: &mut String) {
    if !use_color {
        out.push_str(text);
        return;
    }
    out.push_str("\u{1b}[");
    out.push_str(color);
    out.push('m');
    out.push_str(text);
    out.push_str("\u{1b}[0m");
}
