//! Purpose: Parse a slash-delimited pattern into resolution steps.
//! Exports: `Pattern`, `Step`, `Dialect`.
//! Role: Two-phase parser run once per pattern; the walker only iterates steps.
//! Invariants: Every pattern has at least one step; `""` is the single empty key.
//! Invariants: Only the final step may carry a conversion tag.
//! Notes: `Dialect::Legacy` keeps the older "first `!` ends the pattern" behavior.
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// How `!` conversion suffixes are located.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Dialect {
    /// The suffix is split off the final segment only; `!` elsewhere is a key character.
    #[default]
    Final,
    /// The first `!` seen before the next `/` ends the pattern. The tag runs only up
    /// to that `/`; the remaining segments are dropped without a warning.
    Legacy,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub segment: String,
    /// Raw conversion tag, validated when applied.
    pub conversion: Option<String>,
}

impl Step {
    fn plain(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            conversion: None,
        }
    }

    fn converted(segment: &str, tag: &str) -> Self {
        Self {
            segment: segment.to_string(),
            conversion: Some(tag.to_string()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    steps: Vec<Step>,
}

impl Pattern {
    pub fn parse(raw: &str) -> Self {
        Self::parse_with(raw, Dialect::Final)
    }

    pub fn parse_legacy(raw: &str) -> Self {
        Self::parse_with(raw, Dialect::Legacy)
    }

    pub fn parse_with(raw: &str, dialect: Dialect) -> Self {
        let steps = match dialect {
            Dialect::Final => final_steps(raw),
            Dialect::Legacy => legacy_steps(raw),
        };
        Self {
            raw: raw.to_string(),
            steps,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Conversion tag of the final step, if any.
    pub fn conversion(&self) -> Option<&str> {
        self.steps.last().and_then(|step| step.conversion.as_deref())
    }
}

impl FromStr for Pattern {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(raw))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn final_steps(raw: &str) -> Vec<Step> {
    let mut segments: Vec<&str> = raw.split('/').collect();
    // A trailing `/` leaves an empty tail, which is never resolved.
    if segments.len() > 1 && segments.last() == Some(&"") {
        segments.pop();
    }
    let Some(last) = segments.pop() else {
        return Vec::new();
    };
    let mut steps: Vec<Step> = segments.into_iter().map(Step::plain).collect();
    steps.push(match last.split_once('!') {
        Some((segment, tag)) => Step::converted(segment, tag),
        None => Step::plain(last),
    });
    steps
}

fn legacy_steps(raw: &str) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut rest = raw;
    loop {
        let slash = rest.find('/');
        match (rest.find('!'), slash) {
            (Some(bang), _) if slash.is_none_or(|slash| bang < slash) => {
                let after = &rest[bang + 1..];
                let tag = after.split_once('/').map_or(after, |(tag, _)| tag);
                steps.push(Step::converted(&rest[..bang], tag));
                break;
            }
            (_, Some(slash)) => {
                steps.push(Step::plain(&rest[..slash]));
                rest = &rest[slash + 1..];
                if rest.is_empty() {
                    break;
                }
            }
            (_, None) => {
                steps.push(Step::plain(rest));
                break;
            }
        }
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::{Dialect, Pattern, Step};

    fn segments(pattern: &Pattern) -> Vec<&str> {
        pattern
            .steps()
            .iter()
            .map(|step| step.segment.as_str())
            .collect()
    }

    #[test]
    fn splits_on_slashes() {
        let pattern = Pattern::parse("data/0/name");
        assert_eq!(segments(&pattern), ["data", "0", "name"]);
        assert_eq!(pattern.conversion(), None);
        assert_eq!(pattern.to_string(), "data/0/name");
    }

    #[test]
    fn empty_pattern_is_one_empty_segment() {
        assert_eq!(segments(&Pattern::parse("")), [""]);
        assert_eq!(segments(&Pattern::parse_legacy("")), [""]);
        assert_eq!(Pattern::parse("").as_str(), "");
    }

    #[test]
    fn trailing_slash_is_ignored_but_inner_empty_segments_are_kept() {
        assert_eq!(segments(&Pattern::parse("data/")), ["data"]);
        assert_eq!(segments(&Pattern::parse("a//b")), ["a", "", "b"]);
        assert_eq!(segments(&Pattern::parse("/a")), ["", "a"]);
        assert_eq!(segments(&Pattern::parse_legacy("data/")), ["data"]);
    }

    #[test]
    fn conversion_splits_final_segment() {
        let pattern = Pattern::parse("data/0/count!int");
        assert_eq!(segments(&pattern), ["data", "0", "count"]);
        assert_eq!(pattern.conversion(), Some("int"));
        assert_eq!(
            pattern.steps()[2],
            Step {
                segment: "count".to_string(),
                conversion: Some("int".to_string()),
            }
        );
    }

    #[test]
    fn bang_before_slash_is_a_key_character_by_default() {
        let pattern = Pattern::parse("a!i/b");
        assert_eq!(segments(&pattern), ["a!i", "b"]);
        assert_eq!(pattern.conversion(), None);
    }

    #[test]
    fn legacy_bang_before_slash_ends_the_pattern() {
        let pattern = Pattern::parse_with("a!i/b/c", Dialect::Legacy);
        assert_eq!(segments(&pattern), ["a"]);
        assert_eq!(pattern.conversion(), Some("i"));
        assert_eq!(pattern.as_str(), "a!i/b/c");
    }

    #[test]
    fn dialects_agree_when_bang_is_in_last_segment() {
        for raw in ["a/b!f", "x!r", "data/0/name"] {
            assert_eq!(Pattern::parse(raw), Pattern::parse_legacy(raw), "{raw}");
        }
    }

    #[test]
    fn from_str_uses_default_dialect() {
        let pattern: Pattern = "a!i/b".parse().unwrap();
        assert_eq!(pattern, Pattern::parse("a!i/b"));
    }
}
