//! Speech bubble rendering.
//!
//! Text is framed as
//!
//! ```text
//! /------------\
//! | hello      |
//! \------------/
//!         \
//!          \
//! ```
//!
//! with the tail leading down to the art printed below it.

use std::io::{self, BufRead, Write};

use crate::config::bubble::BubbleConfig;

/// Number of tail lines printed below the bubble.
const TAIL_LINES: usize = 4;

/// Indent of the first tail line.
const TAIL_INDENT: usize = 8;

/// Renders input lines inside a fixed-width speech bubble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechBubble {
    width: usize,
    wrap: bool,
    tab_spaces: Option<String>,
}

impl SpeechBubble {
    /// Creates a bubble.
    ///
    /// # Arguments
    ///
    /// * `width` - Inner width of the bubble, in chars.
    /// * `wrap` - Whether to wrap lines longer than `width` at word boundaries.
    /// * `tab_width` - Replace tabs with this many spaces, or keep them with `None`.
    pub fn new(width: usize, wrap: bool, tab_width: Option<usize>) -> Self {
        Self {
            width,
            wrap,
            tab_spaces: tab_width.map(|n| " ".repeat(n)),
        }
    }

    /// Creates a bubble from configuration.
    pub fn from_config(config: &BubbleConfig) -> Self {
        let tab_width = (!config.no_tab_spaces).then_some(config.tab_width);
        Self::new(config.width, !config.no_wrap, tab_width)
    }

    /// Reads `input` line by line and writes the framed bubble and its tail to `out`.
    pub fn render<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> io::Result<()> {
        let border = "-".repeat(self.width + 2);
        writeln!(out, "/{border}\\")?;

        for line in input.lines() {
            let line = line?;
            let line = match &self.tab_spaces {
                Some(spaces) => line.replace('\t', spaces),
                None => line,
            };

            if self.wrap {
                for wrapped in wrap_words(&line, self.width) {
                    self.write_line(&wrapped, out)?;
                }
            } else {
                self.write_line(&line, out)?;
            }
        }

        writeln!(out, "\\{border}/")?;
        for i in 0..TAIL_LINES {
            writeln!(out, "{} \\", " ".repeat(i + TAIL_INDENT))?;
        }
        Ok(())
    }

    fn write_line<W: Write>(&self, line: &str, out: &mut W) -> io::Result<()> {
        let len = line.chars().count();
        if len > self.width {
            writeln!(out, "| {line}")
        } else {
            writeln!(out, "| {line}{} |", " ".repeat(self.width - len))
        }
    }
}

/// Greedily wraps `line` at whitespace so each piece fits in `width` chars.
///
/// Words longer than `width` are kept whole on a line of their own. A blank
/// line yields a single empty piece.
pub fn wrap_words(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in line.split_whitespace() {
        let word_len = word.chars().count();
        if current_len > 0 && current_len + 1 + word_len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn render(bubble: &SpeechBubble, input: &str) -> String {
        let mut out = Vec::new();
        bubble.render(input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test_case("hello world", 5, &["hello", "world"] ; "splits at space")]
    #[test_case("hello world", 11, &["hello world"] ; "fits exactly")]
    #[test_case("a bb ccc dddd", 6, &["a bb", "ccc", "dddd"] ; "greedy fill")]
    #[test_case("supercalifragilistic is long", 5, &["supercalifragilistic", "is", "long"] ; "long word kept whole")]
    #[test_case("", 10, &[""] ; "blank line")]
    #[test_case("  spaced   out  ", 20, &["spaced out"] ; "collapses whitespace")]
    fn test_wrap_words(line: &str, width: usize, expected: &[&str]) {
        assert_eq!(wrap_words(line, width), expected);
    }

    #[test]
    fn test_render_frame_and_tail() {
        let bubble = SpeechBubble::new(5, true, Some(4));
        let expected = "\
/-------\\
| hi    |
\\-------/
         \\
          \\
           \\
            \\
";
        assert_eq!(render(&bubble, "hi\n"), expected);
    }

    #[test]
    fn test_render_long_line_without_wrap() {
        let bubble = SpeechBubble::new(3, false, None);
        let out = render(&bubble, "toolong\n");
        assert!(out.contains("\n| toolong\n"));
    }

    #[test]
    fn test_render_replaces_tabs() {
        let bubble = SpeechBubble::new(10, false, Some(2));
        let out = render(&bubble, "a\tb\n");
        assert!(out.contains("| a  b       |"));

        let keep_tabs = SpeechBubble::new(10, false, None);
        assert!(render(&keep_tabs, "a\tb\n").contains("a\tb"));
    }

    #[test]
    fn test_from_config() {
        let mut config = BubbleConfig::default();
        config.no_wrap = true;
        config.no_tab_spaces = true;
        assert_eq!(
            SpeechBubble::from_config(&config),
            SpeechBubble::new(config.width, false, None)
        );
    }
}
