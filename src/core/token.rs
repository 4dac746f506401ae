//! Purpose: Classify a single path segment as an index, a slice, or a key attempt.
//! Exports: `SegmentKind`, `SliceBounds`, `classify`, `is_numeric`.
//! Role: Pure, total decision helper consulted by the resolver for sequence access.
//! Invariants: Every string classifies to exactly one kind; classification never fails.
//! Invariants: Numeric strings prefer Index over Slice over Key.

/// Optional half-open bounds of a `start:stop` segment. `None` means the default edge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SliceBounds {
    pub start: Option<i64>,
    pub stop: Option<i64>,
}

impl SliceBounds {
    /// Resolve both bounds against a sequence of `len` items, with negative bounds
    /// counted from the end and everything clamped to `[0, len]`.
    pub fn range(&self, len: usize) -> (usize, usize) {
        let start = self.start.map_or(0, |bound| clamp_bound(bound, len));
        let stop = self.stop.map_or(len, |bound| clamp_bound(bound, len));
        (start, stop.max(start))
    }

    pub fn is_identity(&self) -> bool {
        self.start.is_none() && self.stop.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentKind {
    Index(i64),
    Slice(SliceBounds),
    /// One `:` was present but a bound was neither numeric nor empty.
    InvalidSlice,
    /// Anything else; only meaningful as an object key.
    Key,
}

pub fn classify(segment: &str) -> SegmentKind {
    if is_numeric(segment, false) {
        return SegmentKind::Index(parse_index(segment));
    }
    let Some((start, stop)) = segment.split_once(':') else {
        return SegmentKind::Key;
    };
    if stop.contains(':') {
        return SegmentKind::Key;
    }
    match (slice_bound(start), slice_bound(stop)) {
        (Some(start), Some(stop)) => SegmentKind::Slice(SliceBounds { start, stop }),
        _ => SegmentKind::InvalidSlice,
    }
}

/// Digits only, optionally behind a single leading `-`. An empty string counts
/// only when `allow_empty` is set, which slice bounds use for "default".
pub fn is_numeric(text: &str, allow_empty: bool) -> bool {
    if text.is_empty() {
        return allow_empty;
    }
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

// Outer None: not a valid bound. Inner None: empty, use the default edge.
fn slice_bound(text: &str) -> Option<Option<i64>> {
    if !is_numeric(text, true) {
        return None;
    }
    if text.is_empty() {
        return Some(None);
    }
    Some(Some(parse_index(text)))
}

// Callers have already checked the digits, so only overflow can fail here.
fn parse_index(text: &str) -> i64 {
    text.parse::<i64>().unwrap_or(if text.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

fn clamp_bound(bound: i64, len: usize) -> usize {
    let len_i = i64::try_from(len).unwrap_or(i64::MAX);
    let bound = if bound < 0 {
        bound.saturating_add(len_i)
    } else {
        bound
    };
    bound.clamp(0, len_i) as usize
}

/// Map a possibly negative index onto `[0, len)`.
pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    let len_i = i64::try_from(len).ok()?;
    let index = if index < 0 {
        index.checked_add(len_i)?
    } else {
        index
    };
    if (0..len_i).contains(&index) {
        Some(index as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{SegmentKind, SliceBounds, classify, is_numeric, normalize_index};

    #[test]
    fn numeric_accepts_digits_and_single_minus() {
        assert!(is_numeric("0", false));
        assert!(is_numeric("42", false));
        assert!(is_numeric("-1", false));
        assert!(!is_numeric("-", false));
        assert!(!is_numeric("--1", false));
        assert!(!is_numeric("+1", false));
        assert!(!is_numeric("1.5", false));
        assert!(!is_numeric("", false));
        assert!(is_numeric("", true));
    }

    #[test]
    fn classify_prefers_index_then_slice_then_key() {
        assert_eq!(classify("3"), SegmentKind::Index(3));
        assert_eq!(classify("-2"), SegmentKind::Index(-2));
        assert_eq!(
            classify("1:"),
            SegmentKind::Slice(SliceBounds {
                start: Some(1),
                stop: None
            })
        );
        assert_eq!(
            classify(":-1"),
            SegmentKind::Slice(SliceBounds {
                start: None,
                stop: Some(-1)
            })
        );
        assert_eq!(classify(":"), SegmentKind::Slice(SliceBounds::default()));
        assert_eq!(classify("a:1"), SegmentKind::InvalidSlice);
        assert_eq!(classify("1:-"), SegmentKind::InvalidSlice);
        assert_eq!(classify("1:2:3"), SegmentKind::Key);
        assert_eq!(classify("name"), SegmentKind::Key);
        assert_eq!(classify(""), SegmentKind::Key);
    }

    #[test]
    fn overflowing_index_saturates() {
        assert_eq!(
            classify("99999999999999999999"),
            SegmentKind::Index(i64::MAX)
        );
        assert_eq!(
            classify("-99999999999999999999"),
            SegmentKind::Index(i64::MIN)
        );
    }

    #[test]
    fn slice_range_clamps_and_counts_from_end() {
        let bounds = SliceBounds {
            start: Some(-2),
            stop: None,
        };
        assert_eq!(bounds.range(5), (3, 5));

        let bounds = SliceBounds {
            start: Some(4),
            stop: Some(2),
        };
        assert_eq!(bounds.range(5), (4, 4));

        let bounds = SliceBounds {
            start: Some(-10),
            stop: Some(10),
        };
        assert_eq!(bounds.range(3), (0, 3));
    }

    #[test]
    fn normalize_index_handles_negative_and_out_of_range() {
        assert_eq!(normalize_index(0, 3), Some(0));
        assert_eq!(normalize_index(-1, 3), Some(2));
        assert_eq!(normalize_index(-3, 3), Some(0));
        assert_eq!(normalize_index(-4, 3), None);
        assert_eq!(normalize_index(3, 3), None);
        assert_eq!(normalize_index(i64::MIN, 3), None);
        assert_eq!(normalize_index(0, 0), None);
    }
}
