#![forbid(unsafe_code)]

//! Display-width measurement.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Number of terminal columns `s` occupies.
///
/// Wide (CJK) characters count as two columns; zero-width combining marks
/// count as zero.
#[must_use]
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Number of terminal columns the single character `c` occupies.
#[must_use]
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Truncate `s` to at most `max` display columns.
///
/// Never splits a wide character in half; the result may be one column
/// short of `max` when a wide character straddles the boundary.
#[must_use]
pub fn truncate_to_width(s: &str, max: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = char_width(c);
        if used + w > max {
            return &s[..idx];
        }
        used += w;
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_is_char_count() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn wide_chars_take_two_columns() {
        assert_eq!(display_width("日本"), 4);
    }

    #[test]
    fn truncate_respects_wide_boundary() {
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn truncation_never_exceeds_budget(s in "\\PC*", max in 0usize..12) {
                let t = truncate_to_width(&s, max);
                prop_assert!(display_width(t) <= max);
                prop_assert!(s.starts_with(t));
            }
        }
    }
}
