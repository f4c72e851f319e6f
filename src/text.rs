//! Display width measurement and width-bounded truncation.
//!
//! Width here is one terminal column per Unicode scalar value, regardless
//! of UTF-8 byte length. Double-width glyphs (CJK, emoji) are undercounted;
//! this is a known limitation the layout math depends on, not a bug to fix
//! in isolation.

/// Ellipsis used by right-priority truncation.
const ELLIPSIS: &str = "...";

/// Path-segment gap marker used by smart path truncation.
const PATH_GAP: &str = "/.../";

/// Display width of a string: one column per Unicode scalar value.
#[must_use]
pub fn display_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate `s` to at most `max_width` display columns.
///
/// Prefers smart path truncation for strings containing `/`: the first
/// path segment is kept, as many following segments as fit are appended,
/// then a `/.../` gap and the final segment (the filename). When that does
/// not apply or does not fit, falls back to right-priority truncation:
/// the rightmost `max_width - 3` columns prefixed with `...`.
///
/// The result never exceeds `max_width` columns and the function never
/// panics, even for degenerate widths.
#[must_use]
pub fn truncate_right_priority(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }

    if max_width < ELLIPSIS.len() + 1 {
        return s.chars().take(max_width).collect();
    }

    if s.contains('/') {
        if let Some(smart) = truncate_path(s, max_width) {
            return smart;
        }
    }

    let keep = max_width - ELLIPSIS.len();
    let tail_start = s.chars().count() - keep;
    let tail: String = s.chars().skip(tail_start).collect();
    format!("{ELLIPSIS}{tail}")
}

/// Smart path truncation: `first[/middle...]/.../filename`.
///
/// Returns `None` when even `first/.../filename` would overflow, in which
/// case the caller falls back to right-priority truncation.
fn truncate_path(s: &str, max_width: usize) -> Option<String> {
    let segments: Vec<&str> = s.split('/').collect();
    if segments.len() < 3 {
        return None;
    }

    let first = segments[0];
    let last = segments[segments.len() - 1];
    let fixed = display_width(first) + PATH_GAP.chars().count() + display_width(last);
    if fixed > max_width {
        return None;
    }

    let mut kept = String::from(first);
    let mut kept_width = display_width(first);
    for segment in &segments[1..segments.len() - 1] {
        let extra = 1 + display_width(segment);
        let gap = PATH_GAP.chars().count() + display_width(last);
        if kept_width + extra + gap > max_width {
            break;
        }
        kept.push('/');
        kept.push_str(segment);
        kept_width += extra;
    }

    Some(format!("{kept}{PATH_GAP}{last}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_counts_scalars() {
        assert_eq!(display_width(""), 0);
        assert_eq!(display_width("abc"), 3);
        // Multi-byte scalars each count as one column.
        assert_eq!(display_width("héllo"), 5);
        assert_eq!(display_width("日本語"), 3);
    }

    #[test]
    fn test_short_strings_unchanged() {
        assert_eq!(truncate_right_priority("a.txt", 10), "a.txt");
        assert_eq!(truncate_right_priority("", 4), "");
    }

    #[test]
    fn test_right_priority_keeps_tail() {
        let out = truncate_right_priority("abcdefghij", 7);
        assert_eq!(out, "...ghij");
        assert_eq!(display_width(&out), 7);
    }

    #[test]
    fn test_smart_path_keeps_first_and_filename() {
        let out = truncate_right_priority("src/deeply/nested/module/file.rs", 20);
        assert!(out.starts_with("src"));
        assert!(out.ends_with("file.rs"));
        assert!(out.contains("/.../"));
        assert!(display_width(&out) <= 20);
    }

    #[test]
    fn test_smart_path_adds_middle_segments_greedily() {
        let out = truncate_right_priority("a/bb/ccc/dddd/eeeee/f.txt", 18);
        // "a/bb/ccc" + "/.../" + "f.txt" = 18 columns exactly.
        assert_eq!(out, "a/bb/ccc/.../f.txt");
    }

    #[test]
    fn test_smart_path_falls_back_when_filename_too_long() {
        let out = truncate_right_priority("dir/averyveryverylongfilename.rs", 12);
        assert!(out.starts_with("..."));
        assert_eq!(display_width(&out), 12);
    }

    #[test]
    fn test_never_wider_than_max() {
        let inputs = [
            "plain-long-string-without-slashes-at-all",
            "a/b/c/d/e/f/g/h/i/j/k.rs",
            "ünïcödé/päth/fïlé.txt",
            "x",
        ];
        for s in inputs {
            for w in 4..30 {
                let out = truncate_right_priority(s, w);
                assert!(
                    display_width(&out) <= w,
                    "{s:?} at width {w} gave {out:?}"
                );
            }
        }
    }

    #[test]
    fn test_idempotent() {
        for s in ["src/deeply/nested/module/file.rs", "abcdefghijklmnop"] {
            for w in 4..25 {
                let once = truncate_right_priority(s, w);
                let twice = truncate_right_priority(&once, w);
                assert_eq!(once, twice, "{s:?} at width {w}");
            }
        }
    }

    #[test]
    fn test_degenerate_widths_do_not_panic() {
        for w in 0..4 {
            let out = truncate_right_priority("some/long/path/file.rs", w);
            assert!(display_width(&out) <= w.max(0));
        }
    }

    #[test]
    fn test_multibyte_tail_never_splits_scalars() {
        let out = truncate_right_priority("αβγδεζηθικλμν", 8);
        assert_eq!(display_width(&out), 8);
        assert!(out.starts_with("..."));
        // Still valid UTF-8 by construction; verify the tail content.
        assert!(out.ends_with("ικλμν"));
    }
}
