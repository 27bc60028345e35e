//! Terminal input translation
//!
//! Only key presses and resizes reach the core; mouse, focus and paste
//! events are dropped here.

use crossterm::event::{Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use summoner_core::{Event, Key};

/// Translate a crossterm event into a core event
pub fn translate(event: &TermEvent) -> Option<Event> {
    match event {
        // Only handle Press events (not Release or Repeat)
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
            Some(Event::Key(translate_key(key)))
        }
        TermEvent::Resize(width, height) => Some(Event::Resize {
            width: usize::from(*width),
            height: usize::from(*height),
        }),
        _ => None,
    }
}

/// Translate a single key press
pub fn translate_key(key: &KeyEvent) -> Key {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Esc => Key::Esc,
        _ => Key::Other,
    }
}
