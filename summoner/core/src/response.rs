//! Response Controls
//!
//! The control bound under a revealed message: either a fixed placeholder
//! line ("Press Enter to continue") or a single-line text input. Both expose
//! the same capability set, resolved by `match`:
//!
//! | Capability      | Placeholder   | TextInput                  |
//! |-----------------|---------------|----------------------------|
//! | `advance`       | no-op         | typing, deletion, focus    |
//! | `current_value` | `""`          | typed text                 |
//! | `set_focus`     | no-op         | enables typing             |
//! | `view`          | the text      | `> value` plus cursor      |

use crate::audio::{SoundEffect, SoundRequest};
use crate::compositor::wrap;
use crate::events::{Effect, Event, ItemId, Key};
use crate::style::{INVERSE, RESET};

/// A fixed line of text that accepts an empty response
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placeholder {
    text: String,
}

impl Placeholder {
    /// Create a placeholder showing `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The text shown
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// A single-line text input
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    focused: bool,
}

impl TextInput {
    /// An empty, unfocused input
    pub fn new() -> Self {
        Self::default()
    }

    fn handle_key(&mut self, key: Key) -> Vec<Effect> {
        if !self.focused {
            return Vec::new();
        }
        match key {
            Key::Char(c) if !c.is_control() => {
                self.value.push(c);
                vec![Effect::PlaySound(SoundRequest::overlapping(SoundEffect::Tap))]
            }
            Key::Backspace | Key::Delete => {
                self.value.pop();
                vec![Effect::PlaySound(SoundRequest::once(SoundEffect::QuietTap))]
            }
            _ => Vec::new(),
        }
    }

    fn view(&self, width: usize) -> String {
        // textwrap drops trailing spaces; the cursor sits after them
        let typed = self.value.trim_end_matches(' ');
        let trailing = &self.value[typed.len()..];
        let body = wrap(typed, width.saturating_sub(2)).replace('\n', "\n  ");
        let mut view = format!("> {body}{trailing}");
        if self.focused {
            view.push_str(INVERSE);
            view.push(' ');
            view.push_str(RESET);
        }
        view
    }
}

/// The control bound to a message
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResponseControl {
    /// Fixed text, empty response
    Placeholder(Placeholder),
    /// Typed response
    Input(TextInput),
}

impl ResponseControl {
    /// A placeholder showing `text`
    pub fn placeholder(text: impl Into<String>) -> Self {
        ResponseControl::Placeholder(Placeholder::new(text))
    }

    /// An empty text input
    pub fn input() -> Self {
        ResponseControl::Input(TextInput::new())
    }

    /// Feed an event; `owner` is the item the control belongs to
    pub fn advance(&mut self, event: &Event, owner: ItemId) -> Vec<Effect> {
        match self {
            ResponseControl::Placeholder(_) => Vec::new(),
            ResponseControl::Input(input) => match event {
                Event::SetInputFocus { item, focused } if *item == owner => {
                    input.focused = *focused;
                    Vec::new()
                }
                Event::Key(key) => input.handle_key(*key),
                _ => Vec::new(),
            },
        }
    }

    /// The response the control currently holds
    pub fn current_value(&self) -> &str {
        match self {
            ResponseControl::Placeholder(_) => "",
            ResponseControl::Input(input) => &input.value,
        }
    }

    /// Focus or unfocus (inputs only)
    pub fn set_focus(&mut self, focused: bool) {
        if let ResponseControl::Input(input) = self {
            input.focused = focused;
        }
    }

    /// Whether the control is accepting typing
    pub fn is_focused(&self) -> bool {
        matches!(self, ResponseControl::Input(input) if input.focused)
    }

    /// Whether an empty response must be rejected
    pub fn requires_input(&self) -> bool {
        self.is_input()
    }

    /// Whether this is a text input
    pub fn is_input(&self) -> bool {
        matches!(self, ResponseControl::Input(_))
    }

    /// Render the control wrapped to `width`
    pub fn view(&self, width: usize) -> String {
        match self {
            ResponseControl::Placeholder(placeholder) => wrap(&placeholder.text, width),
            ResponseControl::Input(input) => input.view(width),
        }
    }
}
