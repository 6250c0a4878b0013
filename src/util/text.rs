use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Terminal column width of `s`. CJK and emoji count as two columns.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate `s` to at most `max_width` columns, ending in "..." when cut.
///
/// Widths of 3 or less have no room for an ellipsis, so the string is cut
/// hard. Returns `Cow::Borrowed` when `s` already fits.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    if max_width <= ELLIPSIS_WIDTH {
        Cow::Owned(s[..end].to_string())
    } else {
        Cow::Owned(format!("{}{}", s[..end].trim_end(), ELLIPSIS))
    }
}

/// Make catalog text safe to print on one logical line.
///
/// Removes ANSI escape sequences (CSI and OSC) and control characters, then
/// collapses every whitespace run, newlines included, into a single space.
/// Titles and overviews are third-party data and must not drive the terminal.
pub fn clean_text(s: &str) -> Cow<'_, str> {
    let needs_work = s.bytes().any(|b| b < 0x20 || b == 0x7f)
        || s.contains("  ")
        || s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace);
    if !needs_work {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameters run until a final byte in 0x40..=0x7e
                    for n in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&n) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    // Terminated by BEL or ST (ESC \)
                    while let Some(n) = chars.next() {
                        if n == '\x07' {
                            break;
                        }
                        if n == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if c.is_whitespace() => pending_space = true,
            c if c.is_control() => {}
            c => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("Amelie"), 6);
        assert_eq!(display_width("千と千尋"), 8);
    }

    #[test]
    fn test_truncate_fits_is_borrowed() {
        assert!(matches!(truncate_to_width("Up", 10), Cow::Borrowed("Up")));
    }

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
        assert_eq!(truncate_to_width("千と千尋の神隠し", 9), "千と千...");
    }

    #[test]
    fn test_truncate_narrow_widths() {
        assert_eq!(truncate_to_width("Test movie", 0), "");
        assert_eq!(truncate_to_width("Test movie", 2), "Te");
        assert_eq!(truncate_to_width("Test movie", 3), "Tes");
    }

    #[test]
    fn test_truncate_never_exceeds_width() {
        for width in 0..20 {
            let out = truncate_to_width("Crouching Tiger, Hidden Dragon 卧虎藏龙", width);
            assert!(display_width(&out) <= width, "width {}: {:?}", width, out);
        }
    }

    #[test]
    fn test_clean_text_clean_input_is_borrowed() {
        assert!(matches!(clean_text("Heat"), Cow::Borrowed("Heat")));
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("  A   quiet\n\nplace \t"), "A quiet place");
    }

    #[test]
    fn test_clean_text_strips_escapes() {
        assert_eq!(clean_text("\x1b[1;31mRed\x1b[0m Alert"), "Red Alert");
        assert_eq!(
            clean_text("\x1b]0;pwned\x07Title\x1b]8;;http://x\x1b\\"),
            "Title"
        );
        assert_eq!(clean_text("Bell\x07 and\x00 null"), "Bell and null");
    }
}
