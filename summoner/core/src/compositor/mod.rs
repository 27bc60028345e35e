//! Layered Compositor
//!
//! Merges a styled foreground text layer over the animated background.
//! Unlike a cell-buffer compositor, both layers arrive as lines of text with
//! inline style tokens, so the merge happens segment by segment:
//!
//! - printable foreground runs ("chunks") always win
//! - foreground space runs that count as transparent show the background
//! - style tokens are zero-width and only change the pending foreground style
//!
//! The [`Granularity`] decides how long a run of foreground spaces must be
//! before it turns transparent. Space runs at the edges of the foreground, and
//! runs touching a style token, are always transparent.
//!
//! A transparent space directly after an inverse-video token is opaque, so
//! callers can draw a visible block cursor over the background.

mod frame;
mod layout;

pub use frame::{CompositeError, Frame, FrameCompositor};
pub use layout::{center_vertically, place_horizontal, wrap};

use crate::style::{char_width, is_inverse, segments, visible, LineWriter, Segment, StyleLedger};

/// How many consecutive foreground spaces make a transparent run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Granularity {
    /// Every foreground space shows the background
    Single,
    /// Only runs of two or more spaces show the background
    #[default]
    Double,
}

impl Granularity {
    /// Minimum length of a transparent run
    pub fn min_run(self) -> usize {
        match self {
            Granularity::Single => 1,
            Granularity::Double => 2,
        }
    }
}

/// Background line split into rendered columns
///
/// `None` marks the trailing column of a wide glyph.
struct Columns {
    cells: Vec<Option<char>>,
}

impl Columns {
    fn from_line(line: &str) -> Self {
        let mut cells = Vec::new();
        for segment in segments(line) {
            let (Segment::Text(run) | Segment::Spaces(run)) = segment else {
                continue;
            };
            for c in run.chars() {
                let width = char_width(c);
                if width == 0 {
                    continue;
                }
                cells.push(Some(visible(c)));
                cells.extend(std::iter::repeat(None).take(width - 1));
            }
        }
        Self { cells }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }

    /// Glyphs for columns `from..to`, exactly `to - from` columns wide
    fn slice(&self, from: usize, to: usize) -> String {
        let mut out = String::new();
        let mut col = from;
        while col < to {
            match self.cells.get(col) {
                Some(Some(c)) if col + char_width(*c) <= to => {
                    out.push(*c);
                    col += char_width(*c);
                }
                _ => {
                    out.push(' ');
                    col += 1;
                }
            }
        }
        out
    }
}

/// Merges one foreground line over one background line
#[derive(Clone, Debug, Default)]
pub struct LineCompositor {
    background_style: String,
}

impl LineCompositor {
    /// Create a compositor that paints background glyphs with `background_style`
    pub fn new(background_style: impl Into<String>) -> Self {
        Self {
            background_style: background_style.into(),
        }
    }

    /// The style applied to background glyphs
    pub fn background_style(&self) -> &str {
        &self.background_style
    }

    /// Overlay `foreground` on `background`
    ///
    /// The output has the rendered width of `background`. Foreground content
    /// beyond that width is clipped.
    pub fn overlay(&self, background: &str, foreground: &str, granularity: Granularity) -> String {
        let columns = Columns::from_line(background);
        let width = columns.len();
        let bg_style = self.background_style.as_str();
        let mut writer = LineWriter::default();

        let segs: Vec<Segment<'_>> = segments(foreground).collect();
        if !segs.iter().any(Segment::is_printable) {
            writer.push(&columns.slice(0, width), bg_style);
            return writer.finish();
        }

        let mut ledger = StyleLedger::new();
        let mut col = 0;

        for (i, segment) in segs.iter().enumerate() {
            match *segment {
                Segment::Style(token) => ledger.apply(token),

                Segment::Text(text) => {
                    let mut clipped = String::new();
                    let mut overflow = false;
                    for c in text.chars() {
                        let w = char_width(c);
                        if col + w > width {
                            overflow = true;
                            break;
                        }
                        clipped.push(visible(c));
                        col += w;
                    }
                    writer.push(&clipped, &ledger.active());
                    if overflow {
                        break;
                    }
                }

                Segment::Spaces(run) => {
                    let previous = i.checked_sub(1).map(|j| segs[j]);
                    let after_inverse =
                        matches!(previous, Some(Segment::Style(token)) if is_inverse(token));

                    let mut remaining = run.len();
                    if after_inverse && col < width {
                        writer.push(" ", &ledger.active());
                        col += 1;
                        remaining -= 1;
                    }
                    if remaining == 0 {
                        continue;
                    }

                    let leading = !after_inverse && !segs[..i].iter().any(Segment::is_printable);
                    let trailing = !segs[i + 1..]
                        .iter()
                        .any(|s| matches!(s, Segment::Text(_)));
                    let touches_token = (!after_inverse
                        && matches!(previous, Some(Segment::Style(_))))
                        || matches!(segs.get(i + 1), Some(Segment::Style(_)));
                    let transparent = leading
                        || trailing
                        || touches_token
                        || remaining >= granularity.min_run();

                    let take = remaining.min(width.saturating_sub(col));
                    if transparent {
                        writer.push(&columns.slice(col, col + take), bg_style);
                    } else {
                        writer.push(&" ".repeat(take), &ledger.active());
                    }
                    col += take;
                }
            }

            if col >= width {
                break;
            }
        }

        if col < width {
            writer.push(&columns.slice(col, width), bg_style);
        }

        writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{display_width, strip, INVERSE, RESET};
    use pretty_assertions::assert_eq;

    const BG_STYLE: &str = "\x1b[38;2;59;31;69m";
    const RED: &str = "\x1b[31m";

    fn plain() -> LineCompositor {
        LineCompositor::new("")
    }

    #[test]
    fn test_empty_foreground_is_background() {
        let compositor = LineCompositor::new(BG_STYLE);
        assert_eq!(
            compositor.overlay("..,,", "", Granularity::Double),
            format!("{RESET}{BG_STYLE}..,,{RESET}")
        );
        assert_eq!(plain().overlay("..,,", "", Granularity::Double), "..,,");
    }

    #[test]
    fn test_style_only_foreground_is_background() {
        let fg = format!("{RED}{RESET}");
        assert_eq!(plain().overlay("abcd", &fg, Granularity::Single), "abcd");
    }

    #[test]
    fn test_full_transparency_double() {
        let bg = "#o?.,`#o?.";
        for n in 1..=bg.len() {
            let fg = " ".repeat(n);
            assert_eq!(plain().overlay(bg, &fg, Granularity::Double), bg);
        }

        let styled = LineCompositor::new(BG_STYLE);
        assert_eq!(
            styled.overlay(bg, "          ", Granularity::Double),
            styled.overlay(bg, "", Granularity::Double)
        );
    }

    #[test]
    fn test_opacity_law() {
        let fg = "summoning!";
        for bg in ["..........", "##########", "o?o?o?o?o?"] {
            assert_eq!(plain().overlay(bg, fg, Granularity::Double), fg);
            assert_eq!(plain().overlay(bg, fg, Granularity::Single), fg);
        }
    }

    #[test]
    fn test_short_foreground_fills_from_background() {
        assert_eq!(
            plain().overlay("..........", "ok", Granularity::Double),
            "ok........"
        );
    }

    #[test]
    fn test_single_space_granularity() {
        let bg = "abcdefghij";
        assert_eq!(plain().overlay(bg, "xy z", Granularity::Double), "xy zefghij");
        assert_eq!(plain().overlay(bg, "xy z", Granularity::Single), "xyczefghij");
    }

    #[test]
    fn test_double_space_run_is_transparent() {
        assert_eq!(
            plain().overlay("abcdefghij", "x  y", Granularity::Double),
            "xbcyefghij"
        );
    }

    #[test]
    fn test_leading_indent_is_transparent() {
        assert_eq!(
            plain().overlay("abcdefghij", "   go", Granularity::Double),
            "abcgofghij"
        );
    }

    #[test]
    fn test_foreground_style_applies_to_chunks() {
        let fg = format!("{RED}hi{RESET}");
        let out = plain().overlay("..........", &fg, Granularity::Double);
        assert_eq!(out, format!("{RESET}{RED}hi{RESET}........"));
    }

    #[test]
    fn test_no_redundant_prefix_within_style() {
        let fg = format!("{RED}one two");
        let out = plain().overlay("..........", &fg, Granularity::Double);
        assert_eq!(out.matches(RED).count(), 1);
        assert_eq!(strip(&out), "one two...");
    }

    #[test]
    fn test_background_style_restored_after_chunk() {
        let compositor = LineCompositor::new(BG_STYLE);
        let fg = format!("{RED}ok");
        let out = compositor.overlay("....", &fg, Granularity::Double);
        assert_eq!(out, format!("{RESET}{RED}ok{RESET}{BG_STYLE}..{RESET}"));
    }

    #[test]
    fn test_space_touching_token_is_transparent() {
        let fg = format!("a {RED}b");
        assert_eq!(
            strip(&plain().overlay("..........", &fg, Granularity::Double)),
            "a.b......."
        );
    }

    #[test]
    fn test_inverse_space_is_opaque() {
        let fg = format!("> {INVERSE} {RESET}");
        let out = plain().overlay("..........", &fg, Granularity::Single);
        assert_eq!(strip(&out), ">. .......");
        assert!(out.contains(&format!("{INVERSE} ")));
    }

    #[test]
    fn test_clips_wide_foreground() {
        let out = plain().overlay("....", "abcdefg", Granularity::Double);
        assert_eq!(out, "abcd");

        let out = plain().overlay("...", "ab漢", Granularity::Double);
        assert_eq!(out, "ab.");
    }

    #[test]
    fn test_wide_background_glyph_split() {
        let out = plain().overlay("漢字..", " x", Granularity::Double);
        assert_eq!(display_width(&out), 6);
        assert_eq!(out, " x字..");
    }

    #[test]
    fn test_width_preserved_for_mixed_lines() {
        let compositor = LineCompositor::new(BG_STYLE);
        let bg = "?¿o#.,`ÆÀÁ?¿o#.,`ÆÀÁ";
        let inputs = [
            String::new(),
            "x".to_string(),
            format!("{RED}  a b   c{RESET}  "),
            format!("{INVERSE} {RESET}tail"),
            "               everything-at-the-end".to_string(),
            format!("{RED}\x1b[;m broken"),
        ];
        for fg in &inputs {
            for granularity in [Granularity::Single, Granularity::Double] {
                let out = compositor.overlay(bg, fg, granularity);
                assert_eq!(display_width(&out), 20, "fg {fg:?}");
            }
        }
    }

    #[test]
    fn test_stray_escape_cannot_join_into_a_token() {
        let fg = "bc\x1b[0m漢\x1b[\x1b[0mbc\x1b[31m";
        let out = plain().overlay("#..#..#", fg, Granularity::Double);
        assert_eq!(display_width(&out), 7);
        assert_eq!(strip(&out), "bc漢\u{241B}[b");
    }

    #[test]
    fn test_width_preserved_for_random_lines() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let fg_pieces = [
            "a", "bc", "漢", " ", "  ", "\x1b[", "\x1b", "\x1b[0m", "\x1b[31m", "\x1b[7m", "\x1b[;",
        ];
        let bg_pieces = ["#", ".", "..", "漢", "o", " ", "\x1b[", "\x1b"];
        let mut rng = StdRng::seed_from_u64(41);
        let compositor = LineCompositor::new(BG_STYLE);

        for _ in 0..5000 {
            let fg: String = (0..rng.gen_range(0..10))
                .map(|_| fg_pieces[rng.gen_range(0..fg_pieces.len())])
                .collect();
            let bg: String = (0..rng.gen_range(0..10))
                .map(|_| bg_pieces[rng.gen_range(0..bg_pieces.len())])
                .collect();
            let granularity = if rng.gen_bool(0.5) {
                Granularity::Single
            } else {
                Granularity::Double
            };
            let out = compositor.overlay(&bg, &fg, granularity);
            assert_eq!(
                display_width(&out),
                display_width(&bg),
                "fg {fg:?} bg {bg:?} out {out:?}"
            );
        }
    }
}
