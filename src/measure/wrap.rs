//! Display-width text wrapping.
//!
//! Lines break at spaces where possible; words wider than the available width
//! are hard-broken by character. Widths are measured in terminal cells with
//! `unicode-width`, so CJK and emoji count as two cells.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Measures how many lines a text occupies at a given width.
pub trait TextMeasurer {
    /// Number of rendered lines for `text` at `width` cells. Always >= 1.
    fn line_count(&self, text: &str, width: u16) -> usize;
}

/// Word-wrap-then-hard-break measurer.
///
/// Counts exactly the lines [`WrappedTextMeasurer::wrap`] produces, so a
/// renderer drawing the wrapped lines gets the height it was promised.
#[derive(Debug, Clone, Copy, Default)]
pub struct WrappedTextMeasurer;

impl WrappedTextMeasurer {
    /// Split `text` into display lines no wider than `width`.
    ///
    /// Width 0 disables wrapping: each logical line is one display line.
    /// Empty text yields a single empty line.
    pub fn wrap(text: &str, width: u16) -> Vec<String> {
        let mut out = Vec::new();
        for logical in text.split('\n') {
            let logical = logical.strip_suffix('\r').unwrap_or(logical);
            if width == 0 {
                out.push(logical.to_string());
            } else {
                wrap_line(logical, usize::from(width), &mut out);
            }
        }
        out
    }
}

impl TextMeasurer for WrappedTextMeasurer {
    fn line_count(&self, text: &str, width: u16) -> usize {
        Self::wrap(text, width).len()
    }
}

fn wrap_line(line: &str, width: usize, out: &mut Vec<String>) {
    if line.width() <= width {
        out.push(line.to_string());
        return;
    }

    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_inclusive(' ') {
        let word_width = word.width();
        let trimmed_width = word.trim_end_matches(' ').width();

        if current_width + trimmed_width <= width {
            current.push_str(word);
            current_width += word_width;
            continue;
        }

        if !current.is_empty() {
            out.push(current.trim_end_matches(' ').to_string());
            current.clear();
            current_width = 0;
        }

        if trimmed_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        // Word wider than the line: hard-break it.
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                out.push(current.trim_end_matches(' ').to_string());
                current.clear();
                current_width = 0;
                if ch == ' ' {
                    continue;
                }
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    let tail = current.trim_end_matches(' ');
    if !tail.is_empty() || out.is_empty() {
        out.push(tail.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_one_line() {
        assert_eq!(WrappedTextMeasurer::wrap("", 10), vec![String::new()]);
        assert_eq!(WrappedTextMeasurer.line_count("", 10), 1);
    }

    #[test]
    fn short_text_is_not_wrapped() {
        assert_eq!(WrappedTextMeasurer::wrap("hello", 10), vec!["hello"]);
    }

    #[test]
    fn wraps_at_spaces() {
        let lines = WrappedTextMeasurer::wrap("alpha beta gamma", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma"]);
    }

    #[test]
    fn hard_breaks_long_words() {
        let lines = WrappedTextMeasurer::wrap("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn newlines_start_new_lines() {
        let lines = WrappedTextMeasurer::wrap("one\ntwo\n\nthree", 20);
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn zero_width_counts_logical_lines() {
        assert_eq!(WrappedTextMeasurer.line_count("a b c d e f", 0), 1);
        assert_eq!(WrappedTextMeasurer.line_count("a\nb", 0), 2);
    }

    #[test]
    fn wide_characters_use_two_cells() {
        // Each CJK character is two cells wide.
        let lines = WrappedTextMeasurer::wrap("日本語テキスト", 6);
        assert_eq!(lines, vec!["日本語", "テキス", "ト"]);
    }

    #[test]
    fn no_wrapped_line_exceeds_width() {
        let text = "the quick brown fox jumps over the lazy dog averyveryverylongword end";
        for width in 1..30u16 {
            for line in WrappedTextMeasurer::wrap(text, width) {
                assert!(
                    line.width() <= usize::from(width),
                    "line {:?} wider than {}",
                    line,
                    width
                );
            }
        }
    }
}
