//! Theme and Colors
//!
//! The palette of the summoning terminal: near-black violet backdrop, white
//! text, blood-red prompts and a faded rust for everything already answered.
//!
//! Styles render to SGR style tokens, one token per attribute, so the
//! compositor's style ledger can de-duplicate them individually.

use crate::style::RESET;

/// A 24-bit color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

// ============================================================================
// Palette
// ============================================================================

/// Backdrop color behind everything
pub const BACKGROUND: Rgb = Rgb(0x0F, 0x01, 0x14);

/// Primary text
pub const TEXT: Rgb = Rgb(0xFF, 0xFF, 0xFF);

/// Prompts and response controls
pub const SECONDARY_TEXT: Rgb = Rgb(0xFF, 0x26, 0x26);

/// Acknowledged messages
pub const INACTIVE_TEXT: Rgb = Rgb(0x6A, 0x4D, 0x4D);

/// Glyphs of the animated background
pub const BACKDROP_GLYPH: Rgb = Rgb(0x3B, 0x1F, 0x45);

// ============================================================================
// Styles
// ============================================================================

/// A text style that renders to SGR tokens
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    bold: bool,
    inverse: bool,
}

impl Style {
    /// A style with no attributes
    pub const fn new() -> Self {
        Self {
            fg: None,
            bg: None,
            bold: false,
            inverse: false,
        }
    }

    /// Set the foreground color
    #[must_use]
    pub const fn fg(self, color: Rgb) -> Self {
        Self {
            fg: Some(color),
            ..self
        }
    }

    /// Set the background color
    #[must_use]
    pub const fn bg(self, color: Rgb) -> Self {
        Self {
            bg: Some(color),
            ..self
        }
    }

    /// Turn on bold
    #[must_use]
    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }

    /// Turn on inverse video
    #[must_use]
    pub const fn inverse(self) -> Self {
        Self {
            inverse: true,
            ..self
        }
    }

    /// The SGR tokens for this style ("" for the empty style)
    pub fn token(&self) -> String {
        let mut token = String::new();
        if self.bold {
            token.push_str("\x1b[1m");
        }
        if self.inverse {
            token.push_str("\x1b[7m");
        }
        if let Some(Rgb(r, g, b)) = self.fg {
            token.push_str(&format!("\x1b[38;2;{r};{g};{b}m"));
        }
        if let Some(Rgb(r, g, b)) = self.bg {
            token.push_str(&format!("\x1b[48;2;{r};{g};{b}m"));
        }
        token
    }

    /// Apply the style to every non-empty line of `text`
    pub fn paint(&self, text: &str) -> String {
        let token = self.token();
        if token.is_empty() {
            return text.to_string();
        }
        text.split('\n')
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{token}{line}{RESET}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Primary text on the backdrop
pub const PRIMARY: Style = Style::new().fg(TEXT).bg(BACKGROUND);

/// Prompts, placeholders and inputs awaiting a response
pub const SECONDARY: Style = PRIMARY.fg(SECONDARY_TEXT);

/// Messages that have been acknowledged
pub const INACTIVE: Style = PRIMARY.fg(INACTIVE_TEXT);

/// Emphasized text
pub const FOCUSED: Style = PRIMARY.bold();

/// The animated background
pub const BACKDROP: Style = Style::new().fg(BACKDROP_GLYPH).bg(BACKGROUND);
