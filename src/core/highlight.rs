//! Purpose: Render a short window of source text around a decode failure.
//! Exports: `highlight`, `Markers`, `DEFAULT_CONTEXT`.
//! Role: Pure formatter used by CLI error reporting; performs no I/O.
//! Invariants: Exactly one position marker, at the requested offset.
//! Invariants: ANSI escapes appear only when color is requested.

/// Default number of characters shown on each side of the offset.
pub const DEFAULT_CONTEXT: usize = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Markers {
    pub snip: &'static str,
    pub here: &'static str,
}

impl Markers {
    pub const PLAIN: Markers = Markers {
        snip: "<snip>",
        here: "<HERE>",
    };

    // Dim italic for truncation, bold red italic for the position.
    pub const COLOR: Markers = Markers {
        snip: "\u{1b}[2;3m<snip>\u{1b}[0m",
        here: "\u{1b}[1;3;31m<HERE>\u{1b}[0m",
    };

    pub fn for_color(color: bool) -> Self {
        if color { Self::COLOR } else { Self::PLAIN }
    }
}

/// Show up to `lead` characters before and `tail` characters after byte `offset`.
///
/// A truncation marker is added on a side whenever the window reaches or stays
/// inside the text on that side (`offset - lead >= 0`, `offset + tail <= len`).
/// Offsets past the end clamp to the end; offsets inside a multi-byte character
/// move back to its first byte.
pub fn highlight(text: &str, offset: usize, lead: usize, tail: usize, color: bool) -> String {
    let markers = Markers::for_color(color);
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let (before, after) = text.split_at(offset);

    let mut out = String::with_capacity(lead + tail + 32);
    let before_chars = before.chars().count();
    if lead > before_chars {
        out.push_str(before);
    } else {
        let start = before
            .char_indices()
            .nth(before_chars - lead)
            .map_or(before.len(), |(idx, _)| idx);
        out.push_str(markers.snip);
        out.push_str(&before[start..]);
    }

    out.push_str(markers.here);

    let after_chars = after.chars().count();
    if tail > after_chars {
        out.push_str(after);
    } else {
        let end = after
            .char_indices()
            .nth(tail)
            .map_or(after.len(), |(idx, _)| idx);
        out.push_str(&after[..end]);
        out.push_str(markers.snip);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::highlight;

    #[test]
    fn short_text_has_no_truncation() {
        assert_eq!(highlight(r#"{"a": }"#, 6, 8, 8, false), r#"{"a": <HERE>}"#);
    }

    #[test]
    fn long_text_is_truncated_on_both_sides() {
        let text = "0123456789abcdefghij";
        assert_eq!(highlight(text, 10, 4, 3, false), "<snip>6789<HERE>abc<snip>");
    }

    #[test]
    fn exact_boundaries_still_mark_truncation() {
        let text = "abcdef";
        assert_eq!(highlight(text, 3, 3, 3, false), "<snip>abc<HERE>def<snip>");
        assert_eq!(highlight(text, 3, 4, 4, false), "abc<HERE>def");
    }

    #[test]
    fn offsets_at_edges() {
        assert_eq!(highlight("abc", 0, 2, 1, false), "<HERE>a<snip>");
        assert_eq!(highlight("abc", 3, 1, 2, false), "<snip>c<HERE>");
        assert_eq!(highlight("abc", 99, 5, 5, false), "abc<HERE>");
        assert_eq!(highlight("", 0, 0, 0, false), "<snip><HERE><snip>");
    }

    #[test]
    fn windows_count_characters_not_bytes() {
        let text = "ääää!öööö";
        let offset = text.find('!').unwrap();
        assert_eq!(highlight(text, offset, 2, 2, false), "<snip>ää<HERE>!ö<snip>");
        // Inside a two-byte character: moves back to its start.
        assert_eq!(highlight(text, 1, 5, 1, false), "<HERE>ä<snip>");
    }

    #[test]
    fn color_wraps_markers_in_ansi() {
        let out = highlight("0123456789", 5, 2, 2, true);
        assert_eq!(
            out,
            "\u{1b}[2;3m<snip>\u{1b}[0m34\u{1b}[1;3;31m<HERE>\u{1b}[0m56\u{1b}[2;3m<snip>\u{1b}[0m"
        );
    }
}
