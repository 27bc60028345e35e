//! Frame composition
//!
//! Applies the line compositor to every row of a fixed-size frame.

use std::fmt;

use thiserror::Error;

use super::{Granularity, LineCompositor};
use crate::style::{display_width, strip};

/// Errors from composing a frame
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    /// The background block does not have the configured dimensions
    #[error(
        "background is {actual_width}x{actual_height}, expected {width}x{height}"
    )]
    DimensionMismatch {
        /// Configured width
        width: usize,
        /// Configured height
        height: usize,
        /// Rendered width of the background's first line
        actual_width: usize,
        /// Number of background lines
        actual_height: usize,
    },
}

/// A composited frame: `height` rows of exactly `width` rendered columns
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    rows: Vec<String>,
}

impl Frame {
    /// Frame width in columns
    pub fn width(&self) -> usize {
        self.width
    }

    /// Frame height in rows
    pub fn height(&self) -> usize {
        self.height
    }

    /// Styled rows, top to bottom
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Rows with style tokens removed
    pub fn plain_rows(&self) -> Vec<String> {
        self.rows.iter().map(|row| strip(row)).collect()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rows.join("\n"))
    }
}

/// Composes full frames of a fixed size
#[derive(Clone, Debug)]
pub struct FrameCompositor {
    width: usize,
    height: usize,
    lines: LineCompositor,
}

impl FrameCompositor {
    /// Create a frame compositor for `width` x `height` frames
    pub fn new(width: usize, height: usize, background_style: impl Into<String>) -> Self {
        Self {
            width,
            height,
            lines: LineCompositor::new(background_style),
        }
    }

    /// Overlay the `foreground` block on the `background` block
    ///
    /// The background must be exactly the configured size. Foreground lines
    /// past the bottom of the frame are dropped.
    pub fn place_overlay(
        &self,
        foreground: &str,
        background: &str,
        granularity: Granularity,
    ) -> Result<Frame, CompositeError> {
        let bg_lines: Vec<&str> = if background.is_empty() {
            Vec::new()
        } else {
            background.split('\n').collect()
        };
        let actual_height = bg_lines.len();
        let actual_width = bg_lines.first().map_or(0, |line| display_width(line));

        // An empty block is only valid for a zero-sized frame
        let matches = actual_height == self.height
            && (actual_width == self.width || self.height == 0);
        if !matches {
            return Err(CompositeError::DimensionMismatch {
                width: self.width,
                height: self.height,
                actual_width,
                actual_height,
            });
        }

        let mut fg_lines = foreground.split('\n');
        let rows = bg_lines
            .iter()
            .map(|bg| {
                let fg = fg_lines.next().unwrap_or("");
                self.lines.overlay(bg, fg, granularity)
            })
            .collect();

        Ok(Frame {
            width: self.width,
            height: self.height,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ok_frame() {
        let compositor = FrameCompositor::new(10, 3, "");
        let background = "..........\n..........\n..........";
        let frame = compositor
            .place_overlay("ok", background, Granularity::Double)
            .unwrap();
        assert_eq!(
            frame.plain_rows(),
            vec!["ok........", "..........", ".........."]
        );
    }

    #[test]
    fn test_rows_beyond_foreground_use_background_style() {
        let compositor = FrameCompositor::new(4, 2, "\x1b[35m");
        let frame = compositor
            .place_overlay("ab", "....\n,,,,", Granularity::Double)
            .unwrap();
        assert_eq!(frame.rows()[1], "\x1b[0m\x1b[35m,,,,\x1b[0m");
    }

    #[test]
    fn test_dimension_mismatch() {
        let compositor = FrameCompositor::new(10, 3, "");
        let err = compositor
            .place_overlay("ok", ".....\n.....\n.....", Granularity::Double)
            .unwrap_err();
        assert_eq!(
            err,
            CompositeError::DimensionMismatch {
                width: 10,
                height: 3,
                actual_width: 5,
                actual_height: 3,
            }
        );

        let err = compositor
            .place_overlay("", "..........", Granularity::Double)
            .unwrap_err();
        assert!(matches!(
            err,
            CompositeError::DimensionMismatch { actual_height: 1, .. }
        ));
    }

    #[test]
    fn test_zero_sized_frame() {
        let compositor = FrameCompositor::new(0, 0, "");
        let frame = compositor
            .place_overlay("", "", Granularity::Double)
            .unwrap();
        assert!(frame.rows().is_empty());
        assert_eq!(frame.to_string(), "");
    }

    #[test]
    fn test_foreground_taller_than_frame_is_cut() {
        let compositor = FrameCompositor::new(2, 1, "");
        let frame = compositor
            .place_overlay("ab\ncd\nef", "..", Granularity::Double)
            .unwrap();
        assert_eq!(frame.to_string(), "ab");
    }
}
