//! Logical line splitting for property text
//!
//! Folds backslash continuations and drops blank and comment lines.

use std::iter::Peekable;
use std::str::Chars;

/// One logical line: natural lines joined across continuations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based number of the natural line the entry starts on.
    pub number: usize,
    /// Text with leading whitespace and continuation backslashes removed.
    pub text: String,
}

/// Whitespace that separates tokens in property text.
pub const fn is_property_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

/// Iterator over the logical lines of a property text.
pub struct LineReader<'a> {
    chars: Peekable<Chars<'a>>,
    /// Natural line terminators consumed so far.
    terminators: usize,
}

impl<'a> LineReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars().peekable(),
            terminators: 0,
        }
    }

    /// Consumes a `\n`, `\r` or `\r\n` terminator whose first char was `c`.
    fn consume_terminator(&mut self, c: char) {
        if c == '\r' && self.chars.peek() == Some(&'\n') {
            self.chars.next();
        }
        self.terminators += 1;
    }
}

impl Iterator for LineReader<'_> {
    type Item = LogicalLine;

    fn next(&mut self) -> Option<LogicalLine> {
        let mut text = String::new();
        let mut number = self.terminators + 1;
        let mut skip_whitespace = true;
        let mut is_new_line = true;
        let mut is_comment = false;
        let mut appended_line_begin = false;
        let mut preceding_backslash = false;

        while let Some(c) = self.chars.next() {
            let is_terminator = c == '\n' || c == '\r';
            if is_terminator {
                self.consume_terminator(c);
            }

            if skip_whitespace {
                if is_property_whitespace(c) {
                    continue;
                }
                if is_terminator && !appended_line_begin {
                    number = self.terminators + 1;
                    continue;
                }
                skip_whitespace = false;
                appended_line_begin = false;
            }

            if is_new_line {
                is_new_line = false;
                if c == '#' || c == '!' {
                    is_comment = true;
                    continue;
                }
            }

            if !is_terminator {
                text.push(c);
                preceding_backslash = c == '\\' && !preceding_backslash;
                continue;
            }

            if is_comment || text.is_empty() {
                text.clear();
                number = self.terminators + 1;
                skip_whitespace = true;
                is_new_line = true;
                is_comment = false;
                preceding_backslash = false;
                continue;
            }

            if preceding_backslash {
                text.pop();
                skip_whitespace = true;
                appended_line_begin = true;
                preceding_backslash = false;
                continue;
            }

            return Some(LogicalLine { number, text });
        }

        if text.is_empty() || is_comment {
            return None;
        }
        if preceding_backslash {
            text.pop();
        }
        Some(LogicalLine { number, text })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lines(text: &str) -> Vec<(usize, String)> {
        LineReader::new(text).map(|l| (l.number, l.text)).collect()
    }

    #[test]
    fn test_splits_on_all_terminators() {
        assert_eq!(
            lines("a=1\nb=2\r\nc=3\rd=4"),
            vec![
                (1, "a=1".to_string()),
                (2, "b=2".to_string()),
                (3, "c=3".to_string()),
                (4, "d=4".to_string()),
            ]
        );
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        assert_eq!(
            lines("# comment\n\n   \n! other\na=1\n"),
            vec![(5, "a=1".to_string())]
        );
    }

    #[test]
    fn test_strips_leading_whitespace() {
        assert_eq!(lines("  \t key = v "), vec![(1, "key = v ".to_string())]);
    }

    #[test]
    fn test_hash_inside_line_is_text() {
        assert_eq!(lines("a=#1"), vec![(1, "a=#1".to_string())]);
    }

    #[test]
    fn test_joins_continuation_lines() {
        assert_eq!(
            lines("list=a,\\\n    b,\\\r\n    c\nnext=1"),
            vec![(1, "list=a,b,c".to_string()), (4, "next=1".to_string())]
        );
    }

    #[test]
    fn test_even_backslashes_do_not_continue() {
        assert_eq!(
            lines("path=c:\\\\\nnext=1"),
            vec![(1, "path=c:\\\\".to_string()), (2, "next=1".to_string())]
        );
    }

    #[test]
    fn test_comment_is_never_continued() {
        assert_eq!(lines("# note \\\na=1"), vec![(2, "a=1".to_string())]);
    }

    #[test]
    fn test_trailing_backslash_at_end_of_input_is_dropped() {
        assert_eq!(lines("a=1\\"), vec![(1, "a=1".to_string())]);
    }

    #[test]
    fn test_continuation_followed_by_blank_line() {
        assert_eq!(
            lines("a=1\\\n\nb=2"),
            vec![(1, "a=1".to_string()), (3, "b=2".to_string())]
        );
    }
}
