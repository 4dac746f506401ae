//! Purpose: Terminal type coercions applied after a pattern step resolves.
//! Exports: `Conversion`, `convert`, `convert_tag`.
//! Role: Optional last stage of a walk (`data/0/count!int`).
//! Invariants: Failed numeric conversions yield Null plus one warning.
//! Invariants: Unknown tags yield one warning and leave the value untouched.
use std::borrow::Cow;

use serde_json::{Number, Value};

use crate::core::diag::{DiagnosticSink, Warning};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Conversion {
    #[default]
    None,
    AsInt,
    AsFloat,
    AsRepr,
}

impl Conversion {
    /// Parse a conversion tag. The empty tag means no conversion.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "" => Some(Conversion::None),
            "i" | "int" => Some(Conversion::AsInt),
            "f" | "float" => Some(Conversion::AsFloat),
            "r" | "repr" => Some(Conversion::AsRepr),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Conversion::None => "none",
            Conversion::AsInt => "int",
            Conversion::AsFloat => "float",
            Conversion::AsRepr => "repr",
        }
    }
}

pub fn convert<'a, S>(value: Cow<'a, Value>, conversion: Conversion, sink: &mut S) -> Cow<'a, Value>
where
    S: DiagnosticSink + ?Sized,
{
    let converted = match conversion {
        Conversion::None => return value,
        Conversion::AsRepr => Some(Value::String(value.to_string())),
        Conversion::AsInt => as_int(&value),
        Conversion::AsFloat => as_float(&value),
    };
    match converted {
        Some(converted) => Cow::Owned(converted),
        None => {
            sink.warning(Warning::ConversionFailed {
                conversion,
                value: value.to_string(),
            });
            Cow::Owned(Value::Null)
        }
    }
}

/// Look up `tag` and apply it. An unknown tag is reported and the value passes through.
pub fn convert_tag<'a, S>(value: Cow<'a, Value>, tag: &str, sink: &mut S) -> Cow<'a, Value>
where
    S: DiagnosticSink + ?Sized,
{
    match Conversion::from_tag(tag) {
        Some(conversion) => convert(value, conversion, sink),
        None => {
            sink.warning(Warning::UnknownConversion {
                tag: tag.to_string(),
            });
            value
        }
    }
}

fn as_int(value: &Value) -> Option<Value> {
    match value {
        Value::Number(num) if num.is_i64() || num.is_u64() => Some(value.clone()),
        Value::Number(num) => {
            let truncated = num.as_f64()?.trunc();
            // i64::MAX is not exactly representable; the half-open check keeps the cast lossless.
            if truncated >= i64::MIN as f64 && truncated < i64::MAX as f64 {
                Some(Value::from(truncated as i64))
            } else {
                None
            }
        }
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .map(Value::from)
                .or_else(|_| text.parse::<u64>().map(Value::from))
                .ok()
        }
        Value::Bool(flag) => Some(Value::from(i64::from(*flag))),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn as_float(value: &Value) -> Option<Value> {
    let float = match value {
        Value::Number(num) => num.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        Value::Bool(flag) => f64::from(u8::from(*flag)),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    Number::from_f64(float).map(Value::Number)
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::{Conversion, convert, convert_tag};
    use crate::core::diag::Warning;
    use serde_json::{Value, json};

    fn run(value: Value, conversion: Conversion) -> (Value, Vec<Warning>) {
        let mut warnings = Vec::new();
        let out = convert(Cow::Owned(value), conversion, &mut warnings).into_owned();
        (out, warnings)
    }

    #[test]
    fn tags_accept_short_and_long_names() {
        assert_eq!(Conversion::from_tag("i"), Some(Conversion::AsInt));
        assert_eq!(Conversion::from_tag("int"), Some(Conversion::AsInt));
        assert_eq!(Conversion::from_tag("f"), Some(Conversion::AsFloat));
        assert_eq!(Conversion::from_tag("float"), Some(Conversion::AsFloat));
        assert_eq!(Conversion::from_tag("r"), Some(Conversion::AsRepr));
        assert_eq!(Conversion::from_tag("repr"), Some(Conversion::AsRepr));
        assert_eq!(Conversion::from_tag(""), Some(Conversion::None));
        assert_eq!(Conversion::from_tag("integer"), None);
    }

    #[test]
    fn int_parses_numeric_looking_values() {
        assert_eq!(run(json!("42"), Conversion::AsInt), (json!(42), vec![]));
        assert_eq!(run(json!(" -7 "), Conversion::AsInt), (json!(-7), vec![]));
        assert_eq!(run(json!(3.9), Conversion::AsInt), (json!(3), vec![]));
        assert_eq!(run(json!(-3.9), Conversion::AsInt), (json!(-3), vec![]));
        assert_eq!(run(json!(true), Conversion::AsInt), (json!(1), vec![]));
        assert_eq!(
            run(json!("18446744073709551615"), Conversion::AsInt),
            (json!(u64::MAX), vec![])
        );
    }

    #[test]
    fn int_failure_yields_null_and_warning() {
        let (out, warnings) = run(json!("value"), Conversion::AsInt);
        assert_eq!(out, Value::Null);
        assert_eq!(
            warnings,
            vec![Warning::ConversionFailed {
                conversion: Conversion::AsInt,
                value: "\"value\"".to_string(),
            }]
        );

        let (out, warnings) = run(json!("1.5"), Conversion::AsInt);
        assert_eq!(out, Value::Null);
        assert_eq!(warnings.len(), 1);

        let (out, warnings) = run(json!([1]), Conversion::AsInt);
        assert_eq!(out, Value::Null);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn float_parses_numeric_looking_values() {
        assert_eq!(run(json!("1.5"), Conversion::AsFloat), (json!(1.5), vec![]));
        assert_eq!(run(json!(2), Conversion::AsFloat), (json!(2.0), vec![]));
        assert_eq!(run(json!(false), Conversion::AsFloat), (json!(0.0), vec![]));

        let (out, warnings) = run(json!("inf"), Conversion::AsFloat);
        assert_eq!(out, Value::Null);
        assert_eq!(warnings.len(), 1);

        let (out, warnings) = run(json!(null), Conversion::AsFloat);
        assert_eq!(out, Value::Null);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn repr_renders_compact_json_text() {
        let (out, warnings) = run(json!({"a": [1, "x"]}), Conversion::AsRepr);
        assert_eq!(out, json!("{\"a\":[1,\"x\"]}"));
        assert!(warnings.is_empty());
        assert_eq!(run(json!("v"), Conversion::AsRepr).0, json!("\"v\""));
    }

    #[test]
    fn unknown_tag_passes_value_through() {
        let mut warnings = Vec::new();
        let out = convert_tag(Cow::Owned(json!("5")), "hex", &mut warnings);
        assert_eq!(out.into_owned(), json!("5"));
        assert_eq!(
            warnings,
            vec![Warning::UnknownConversion {
                tag: "hex".to_string()
            }]
        );
    }
}
