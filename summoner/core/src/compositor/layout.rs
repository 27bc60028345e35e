//! Block placement helpers

use crate::style::display_width;

/// Pad `text` with blank lines so it sits in the vertical middle of `height`
///
/// Rounds the top padding down. Text at least `height` lines tall is
/// returned unchanged.
pub fn center_vertically(height: usize, text: &str) -> String {
    let lines = text.split('\n').count();
    if lines >= height {
        return text.to_string();
    }
    let pad = (height - lines) / 2;
    format!("{}{}", "\n".repeat(pad), text)
}

/// Indent every line of `text` so the block is centered in `width` columns
pub fn place_horizontal(width: usize, text: &str) -> String {
    let widest = text.split('\n').map(display_width).max().unwrap_or(0);
    let pad = width.saturating_sub(widest) / 2;
    if pad == 0 {
        return text.to_string();
    }
    let indent = " ".repeat(pad);
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Word-wrap plain `text` to `width` columns, keeping explicit newlines
pub fn wrap(text: &str, width: usize) -> String {
    text.split('\n')
        .map(|paragraph| textwrap::wrap(paragraph, width.max(1)).join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}
