//! Typewriter Reveal
//!
//! A message that appears one character per tick, then waits for the player.
//!
//! # State Machine
//!
//! ```text
//!            tick (rendered < len)
//!              ┌──────┐
//!              v      │
//!         ┌──────────────┐  last tick / Enter  ┌──────────────────┐
//! start ─>│  Revealing   │────────────────────>│ AwaitingResponse │
//!         └──────────────┘                     └──────────────────┘
//!                                                │ Enter (value ok)
//!                                                v
//!                                        ┌──────────────┐
//!                                        │ Acknowledged │ (ignores events)
//!                                        └──────────────┘
//! ```
//!
//! Every tick requests the next segment of the item's scroll sound. Reaching
//! the end resets that sound's cycle and, for text inputs, focuses the input.

use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::audio::{SoundEffect, SoundRequest};
use crate::compositor::wrap;
use crate::events::{Effect, Event, ItemId, Key};
use crate::response::ResponseControl;
use crate::theme::{INACTIVE, PRIMARY, SECONDARY};

/// Default interval between revealed characters
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10);

/// Beeps played when a message is acknowledged
const BEEPS: [SoundEffect; 3] = [
    SoundEffect::HighPitchedBeep,
    SoundEffect::LongLowPitchedBeep,
    SoundEffect::ShortLowPitchedBeep,
];

/// Where a revealing message is in its life cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    /// Characters are still appearing
    Revealing,
    /// Fully shown, waiting for Enter
    AwaitingResponse,
    /// Response recorded; immutable
    Acknowledged,
}

/// The segmented sound a message scrolls with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollSound {
    /// Segmented sound effect
    pub effect: SoundEffect,
    /// Number of segments
    pub segments: u32,
}

impl ScrollSound {
    /// Two-segment buzz
    pub const BUZZ: ScrollSound = ScrollSound {
        effect: SoundEffect::DoubleBuzz,
        segments: 2,
    };

    /// Eight-segment clicks and buzzes
    pub const CLICKS: ScrollSound = ScrollSound {
        effect: SoundEffect::RhythmicClicksAndBuzzes,
        segments: 8,
    };

    fn random(rng: &mut impl Rng) -> Self {
        if rng.gen_bool(0.5) {
            Self::BUZZ
        } else {
            Self::CLICKS
        }
    }
}

/// A message revealed one character at a time
#[derive(Clone, Debug)]
pub struct RevealingText {
    id: ItemId,
    text: String,
    len: usize,
    rendered: usize,
    state: RevealState,
    control: ResponseControl,
    scroll: ScrollSound,
    beep: SoundEffect,
    interval: Duration,
    response: Option<String>,
}

impl RevealingText {
    /// Create a message; sounds are picked from `rng`
    pub fn new(
        id: ItemId,
        text: impl Into<String>,
        control: ResponseControl,
        interval: Duration,
        rng: &mut impl Rng,
    ) -> Self {
        let text = text.into();
        let beep = BEEPS
            .choose(&mut *rng)
            .copied()
            .unwrap_or(SoundEffect::HighPitchedBeep);
        Self {
            id,
            len: text.chars().count(),
            text,
            rendered: 0,
            state: RevealState::Revealing,
            control,
            scroll: ScrollSound::random(rng),
            beep,
            interval,
            response: None,
        }
    }

    /// Schedule the first tick (empty text completes at once)
    pub fn start(&mut self) -> Vec<Effect> {
        if self.len == 0 {
            return self.complete();
        }
        vec![self.schedule()]
    }

    fn schedule(&self) -> Effect {
        Effect::after(self.interval, Event::RevealTick { item: self.id })
    }

    /// Handle a scheduler event
    pub fn update(&mut self, event: &Event) -> Vec<Effect> {
        match self.state {
            RevealState::Acknowledged => Vec::new(),
            RevealState::Revealing => match event {
                Event::RevealTick { item } if *item == self.id => self.tick(),
                Event::Key(Key::Enter) => self.complete(),
                _ => self.control.advance(event, self.id),
            },
            RevealState::AwaitingResponse => match event {
                Event::Key(Key::Enter) => self.acknowledge(),
                _ => self.control.advance(event, self.id),
            },
        }
    }

    fn tick(&mut self) -> Vec<Effect> {
        self.rendered = (self.rendered + 1).min(self.len);
        let mut effects = vec![Effect::PlaySound(SoundRequest::cycling(
            self.scroll.effect,
            self.scroll.segments,
        ))];
        if self.rendered < self.len {
            effects.push(self.schedule());
        } else {
            effects.extend(self.complete());
        }
        effects
    }

    fn complete(&mut self) -> Vec<Effect> {
        self.rendered = self.len;
        self.state = RevealState::AwaitingResponse;

        let mut effects = vec![Effect::ResetSoundCycle(self.scroll.effect)];
        if self.control.is_input() {
            effects.push(Effect::Dispatch(Event::SetInputFocus {
                item: self.id,
                focused: true,
            }));
        }
        effects
    }

    fn acknowledge(&mut self) -> Vec<Effect> {
        let response = self.control.current_value().to_string();
        if response.is_empty() && self.control.requires_input() {
            tracing::debug!(item = %self.id, "Rejected empty response");
            return Vec::new();
        }

        let mut effects = Vec::new();
        if self.control.is_input() {
            self.control.set_focus(false);
            effects.push(Effect::Dispatch(Event::SetInputFocus {
                item: self.id,
                focused: false,
            }));
        }
        effects.push(Effect::PlaySound(SoundRequest::once(self.beep)));
        effects.push(Effect::Dispatch(Event::ResponseCaptured {
            item: self.id,
            response: response.clone(),
        }));

        self.response = Some(response);
        self.state = RevealState::Acknowledged;
        effects
    }

    /// Item id
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Full text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Characters revealed so far
    pub fn rendered(&self) -> usize {
        self.rendered
    }

    /// Total characters
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the text is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current state
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Whether every character is shown
    pub fn is_complete(&self) -> bool {
        self.rendered == self.len
    }

    /// The recorded response, once acknowledged
    pub fn response(&self) -> Option<&str> {
        self.response.as_deref()
    }

    /// The bound control
    pub fn control(&self) -> &ResponseControl {
        &self.control
    }

    /// The scroll sound picked for this message
    pub fn scroll_sound(&self) -> ScrollSound {
        self.scroll
    }

    /// The styled view, wrapped to `width`
    pub fn view(&self, width: usize) -> String {
        match self.state {
            RevealState::Revealing => {
                let visible: String = self.text.chars().take(self.rendered).collect();
                PRIMARY.paint(&wrap(&visible, width))
            }
            RevealState::AwaitingResponse => {
                let text = PRIMARY.paint(&wrap(&self.text, width));
                let control = SECONDARY.paint(&self.control.view(width));
                format!("{text}\n{control}")
            }
            RevealState::Acknowledged => {
                let mut view = wrap(&self.text, width);
                if self.control.is_input() {
                    view.push('\n');
                    view.push_str(&self.control.view(width));
                }
                INACTIVE.paint(&view)
            }
        }
    }
}
