//! Style Tokens and the Style Ledger
//!
//! Foreground text reaches the compositor with inline SGR escape sequences
//! ("style tokens") already embedded. This module recognizes those tokens,
//! splits a line into [`Segment`]s, and tracks which style is active at any
//! point in a line.
//!
//! # Token Grammar
//!
//! ```text
//! token := ESC '[' (digits ';')* digits? letter
//! ```
//!
//! Anything starting with `ESC` that does not match the grammar is treated as
//! literal printable content: the stray `ESC` is written as [`STRAY_ESC`] so
//! the output can never re-parse into a token. The canonical reset token is
//! `ESC[0m`.
//!
//! # Emission
//!
//! [`emit`] only re-sends a style when it differs from the last one written,
//! and always resets before applying a new one, so styles never bleed from
//! one segment into the next.

use unicode_width::UnicodeWidthChar;

/// Escape character that opens every style token
pub const ESC: char = '\x1b';

/// The canonical reset token
pub const RESET: &str = "\x1b[0m";

/// Inverse-video token (used for block cursors)
pub const INVERSE: &str = "\x1b[7m";

/// Byte length of the style token at the start of `s`, if there is one
pub fn style_token_len(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.len() < 3 || bytes[0] != 0x1b || bytes[1] != b'[' {
        return None;
    }

    let mut digits_in_group = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(2) {
        match b {
            b'0'..=b'9' => digits_in_group += 1,
            b';' => {
                if digits_in_group == 0 {
                    return None;
                }
                digits_in_group = 0;
            }
            b if b.is_ascii_alphabetic() => return Some(i + 1),
            _ => return None,
        }
    }

    None
}

/// Whether `token` is the canonical reset token
pub fn is_reset(token: &str) -> bool {
    token == RESET
}

/// Whether `token` is an SGR token that turns on inverse video
pub fn is_inverse(token: &str) -> bool {
    let Some(params) = token
        .strip_prefix("\x1b[")
        .and_then(|rest| rest.strip_suffix('m'))
    else {
        return false;
    };
    params.split(';').any(|p| p == "7")
}

/// Visible stand-in for an `ESC` that does not open a style token
pub const STRAY_ESC: char = '\u{241B}';

/// The character written for literal content `c`
pub fn visible(c: char) -> char {
    if c == ESC {
        STRAY_ESC
    } else {
        c
    }
}

/// Rendered column width of a single character as written
///
/// A literal `ESC` counts as its one-column stand-in; other control
/// characters are zero.
pub fn char_width(c: char) -> usize {
    visible(c).width().unwrap_or(0)
}

// ============================================================================
// Segments
// ============================================================================

/// One piece of a styled line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A complete style token (zero rendered width)
    Style(&'a str),
    /// A run of printable, non-space characters
    Text(&'a str),
    /// A run of U+0020 spaces
    Spaces(&'a str),
}

impl Segment<'_> {
    /// Rendered width of this segment
    pub fn width(&self) -> usize {
        match self {
            Segment::Style(_) => 0,
            Segment::Spaces(s) => s.len(),
            Segment::Text(s) => s.chars().map(char_width).sum(),
        }
    }

    /// Whether the segment occupies columns (text or spaces)
    pub fn is_printable(&self) -> bool {
        !matches!(self, Segment::Style(_))
    }
}

/// Iterator over the [`Segment`]s of a line
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.rest;
        let first = rest.chars().next()?;

        let len = if let Some(len) = style_token_len(rest) {
            len
        } else if first == ' ' {
            rest.len() - rest.trim_start_matches(' ').len()
        } else {
            let mut end = 0;
            for (i, c) in rest.char_indices() {
                if i > 0 && (c == ' ' || (c == ESC && style_token_len(&rest[i..]).is_some())) {
                    break;
                }
                end = i + c.len_utf8();
            }
            end
        };

        let (head, tail) = rest.split_at(len);
        self.rest = tail;

        Some(if style_token_len(head) == Some(head.len()) {
            Segment::Style(head)
        } else if first == ' ' {
            Segment::Spaces(head)
        } else {
            Segment::Text(head)
        })
    }
}

/// Split a line into segments
pub fn segments(line: &str) -> Segments<'_> {
    Segments { rest: line }
}

/// A parsed line: style tokens, printable runs and space runs, in order
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledLine<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> StyledLine<'a> {
    /// Parse a single line (no newlines expected)
    pub fn parse(line: &'a str) -> Self {
        Self {
            segments: segments(line).collect(),
        }
    }

    /// The segments in order
    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Rendered width, ignoring style tokens
    pub fn width(&self) -> usize {
        self.segments.iter().map(Segment::width).sum()
    }

    /// True when the line has no printable content at all
    pub fn is_blank(&self) -> bool {
        !self.segments.iter().any(Segment::is_printable)
    }

    /// The line with every style token removed
    pub fn plain(&self) -> String {
        self.segments
            .iter()
            .flat_map(|s| match s {
                Segment::Style(_) => "".chars(),
                Segment::Text(t) | Segment::Spaces(t) => t.chars(),
            })
            .map(visible)
            .collect()
    }
}

/// Rendered width of a line, ignoring style tokens
pub fn display_width(line: &str) -> usize {
    segments(line).map(|s| s.width()).sum()
}

/// Remove every style token from `text` (newlines are kept)
pub fn strip(text: &str) -> String {
    text.split('\n')
        .map(|line| StyledLine::parse(line).plain())
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Style Ledger
// ============================================================================

/// Accumulates style tokens and reports the currently active style
///
/// A reset token clears everything seen so far. Re-applying a token that is
/// already active moves it to the end instead of duplicating it, so the
/// ledger always reads "most recently set wins".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleLedger {
    tokens: Vec<String>,
}

impl StyleLedger {
    /// Create an empty ledger (no active style)
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a single style token
    pub fn apply(&mut self, token: &str) {
        if is_reset(token) {
            self.tokens.clear();
            return;
        }
        self.tokens.retain(|t| t != token);
        self.tokens.push(token.to_string());
    }

    /// The active style as a concatenation of tokens ("" when none)
    pub fn active(&self) -> String {
        self.tokens.concat()
    }

    /// Whether no style is active
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Forget every token
    pub fn clear(&mut self) {
        self.tokens.clear();
    }

    /// Consume the leading run of style tokens in `fragment`
    ///
    /// Whitespace between two tokens of the run does not end the run. Returns
    /// the active style after the run and the remaining printable tail.
    pub fn consume_style_tokens<'a>(&mut self, fragment: &'a str) -> (String, &'a str) {
        let mut rest = fragment;
        loop {
            if let Some(len) = style_token_len(rest) {
                self.apply(&rest[..len]);
                rest = &rest[len..];
                continue;
            }

            let trimmed = rest.trim_start_matches(' ');
            if trimmed.len() != rest.len() && style_token_len(trimmed).is_some() {
                rest = trimmed;
                continue;
            }

            break;
        }
        (self.active(), rest)
    }
}

/// Emit `text` under `style`, given the style that was last emitted
pub fn emit(text: &str, style: &str, last_emitted: &str) -> String {
    if style == last_emitted {
        text.to_string()
    } else {
        format!("{RESET}{style}{text}")
    }
}

/// Builds one output line, tracking the last emitted style
#[derive(Debug, Default)]
pub(crate) struct LineWriter {
    out: String,
    last: String,
}

impl LineWriter {
    pub(crate) fn push(&mut self, text: &str, style: &str) {
        if text.is_empty() {
            return;
        }
        self.out.push_str(&emit(text, style, &self.last));
        if self.last != style {
            self.last = style.to_string();
        }
    }

    /// Finish the line, resetting any style still in effect
    pub(crate) fn finish(mut self) -> String {
        if !self.last.is_empty() {
            self.out.push_str(RESET);
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BOLD: &str = "\x1b[1m";
    const RED: &str = "\x1b[31m";
    const TRUECOLOR: &str = "\x1b[38;2;255;38;38m";

    #[test]
    fn test_token_grammar() {
        assert_eq!(style_token_len("\x1b[0m"), Some(4));
        assert_eq!(style_token_len("\x1b[m"), Some(3));
        assert_eq!(style_token_len(TRUECOLOR), Some(TRUECOLOR.len()));
        assert_eq!(style_token_len("\x1b[1;mrest"), Some(5));
        assert_eq!(style_token_len("\x1b[;1m"), None);
        assert_eq!(style_token_len("\x1b[1;;2m"), None);
        assert_eq!(style_token_len("\x1b[12"), None);
        assert_eq!(style_token_len("\x1b]0;title"), None);
        assert_eq!(style_token_len("plain"), None);
    }

    #[test]
    fn test_inverse_detection() {
        assert!(is_inverse(INVERSE));
        assert!(is_inverse("\x1b[1;7m"));
        assert!(!is_inverse("\x1b[17m"));
        assert!(!is_inverse(RED));
    }

    #[test]
    fn test_segments_split() {
        let line = format!("{BOLD}hi  there{RESET} ");
        let segs: Vec<_> = segments(&line).collect();
        assert_eq!(
            segs,
            vec![
                Segment::Style(BOLD),
                Segment::Text("hi"),
                Segment::Spaces("  "),
                Segment::Text("there"),
                Segment::Style(RESET),
                Segment::Spaces(" "),
            ]
        );
    }

    #[test]
    fn test_malformed_escape_is_text() {
        let segs: Vec<_> = segments("a\x1b[;xb c").collect();
        assert_eq!(
            segs,
            vec![
                Segment::Text("a\x1b[;xb"),
                Segment::Spaces(" "),
                Segment::Text("c"),
            ]
        );
    }

    #[test]
    fn test_stray_escape_is_one_visible_column() {
        assert_eq!(char_width(ESC), 1);
        assert_eq!(display_width("a\x1b[;x"), 5);
        assert_eq!(strip("a\x1b[;x"), "a\u{241B}[;x");
        assert_eq!(style_token_len(&strip("\x1b[0")), None);
    }

    #[test]
    fn test_display_width_and_strip() {
        let line = format!("{RED}ok{RESET} ¿?");
        assert_eq!(display_width(&line), 5);
        assert_eq!(strip(&line), "ok ¿?");
        assert_eq!(display_width("漢字"), 4);
    }

    #[test]
    fn test_styled_line_blank() {
        let line = format!("{BOLD}{RESET}");
        assert!(StyledLine::parse(&line).is_blank());
        assert!(!StyledLine::parse(" ").is_blank());
    }

    #[test]
    fn test_ledger_dedup_and_reset() {
        let mut ledger = StyleLedger::new();
        ledger.apply(BOLD);
        ledger.apply(RED);
        ledger.apply(BOLD);
        assert_eq!(ledger.active(), format!("{RED}{BOLD}"));

        ledger.apply(RESET);
        assert!(ledger.is_empty());
        assert_eq!(ledger.active(), "");
    }

    #[test]
    fn test_consume_leading_run() {
        let mut ledger = StyleLedger::new();
        let fragment = format!("{BOLD}{RED}hello");
        let (style, tail) = ledger.consume_style_tokens(&fragment);
        assert_eq!(style, format!("{BOLD}{RED}"));
        assert_eq!(tail, "hello");
    }

    #[test]
    fn test_consume_reset_clears_before_accumulating() {
        let mut ledger = StyleLedger::new();
        ledger.apply(BOLD);
        let fragment = format!("{RESET}{RED}x");
        let (style, tail) = ledger.consume_style_tokens(&fragment);
        assert_eq!(style, RED);
        assert_eq!(tail, "x");
    }

    #[test]
    fn test_consume_across_whitespace_gap() {
        let mut ledger = StyleLedger::new();
        let fragment = format!("{BOLD}  {RED}word  ");
        let (style, tail) = ledger.consume_style_tokens(&fragment);
        assert_eq!(style, format!("{BOLD}{RED}"));
        assert_eq!(tail, "word  ");
    }

    #[test]
    fn test_consume_empty_after_reset() {
        let mut ledger = StyleLedger::new();
        let (style, tail) = ledger.consume_style_tokens(RESET);
        assert_eq!(style, "");
        assert_eq!(tail, "");
    }

    #[test]
    fn test_emit_is_idempotent() {
        let first = emit("ab", RED, "");
        let second = emit("cd", RED, RED);
        assert_eq!(format!("{first}{second}"), format!("{RESET}{RED}abcd"));
        assert_eq!(format!("{first}{second}").matches(RED).count(), 1);
    }

    #[test]
    fn test_line_writer_resets_at_end() {
        let mut writer = LineWriter::default();
        writer.push("a", RED);
        writer.push("b", RED);
        writer.push("", BOLD);
        assert_eq!(writer.finish(), format!("{RESET}{RED}ab{RESET}"));

        let mut plain = LineWriter::default();
        plain.push("xy", "");
        assert_eq!(plain.finish(), "xy");
    }
}
