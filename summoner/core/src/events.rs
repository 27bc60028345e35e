//! Scheduler Events and Effects
//!
//! Everything that reaches the scheduler is an [`Event`]; everything the
//! scheduler wants done in return is an [`Effect`]. Handlers never sleep or
//! perform I/O. They return effects and the outer loop executes them, so a
//! tick's follow-up is always scheduled after its state update.
//!
//! # Flow
//!
//! ```text
//! terminal ──Event──> Scheduler ──Vec<Effect>──> executor
//!    ^                                              │
//!    └──────── After{delay} / Dispatch ─────────────┘
//! ```

use std::fmt;
use std::time::Duration;

use crate::audio::{SoundEffect, SoundRequest};
use crate::background::AnimationEpoch;

/// Identifier of a scheduled item, assigned in creation order
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item_{}", self.0)
    }
}

/// Key press, independent of the terminal library
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Enter / Return
    Enter,
    /// Backspace
    Backspace,
    /// Delete
    Delete,
    /// Escape
    Esc,
    /// Ctrl-C
    Interrupt,
    /// A character key
    Char(char),
    /// Anything else
    Other,
}

/// Input to the scheduler
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    // ============================================
    // Terminal
    // ============================================
    /// Terminal was resized
    Resize {
        /// New width in columns
        width: usize,
        /// New height in rows
        height: usize,
    },

    /// A key was pressed
    Key(Key),

    // ============================================
    // Ticks
    // ============================================
    /// Background animation tick
    BackgroundTick {
        /// Epoch the tick was scheduled in
        epoch: AnimationEpoch,
    },

    /// Typewriter reveal tick
    RevealTick {
        /// Item being revealed
        item: ItemId,
    },

    /// Summoning circle frame tick
    CircleTick {
        /// Circle item
        item: ItemId,
    },

    // ============================================
    // Item Messages
    // ============================================
    /// Focus or unfocus the input bound to an item
    SetInputFocus {
        /// Owning item
        item: ItemId,
        /// New focus state
        focused: bool,
    },

    /// An item recorded the player's response
    ResponseCaptured {
        /// Item that was acknowledged
        item: ItemId,
        /// The response value ("" for placeholders)
        response: String,
    },
}

/// Follow-up work requested by an event handler
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `event` after `delay`
    After {
        /// How long to wait
        delay: Duration,
        /// Event to deliver
        event: Event,
    },

    /// Deliver `event` in the next dispatch cycle
    Dispatch(Event),

    /// Play a sound
    PlaySound(SoundRequest),

    /// Restart the segment cycle of a segmented sound
    ResetSoundCycle(SoundEffect),

    /// Report a captured response to the narrative driver
    Respond {
        /// Item that was acknowledged
        item: ItemId,
        /// The response value
        response: String,
    },
}

impl Effect {
    /// Deliver `event` after `delay`
    pub fn after(delay: Duration, event: Event) -> Self {
        Effect::After { delay, event }
    }
}
