//! Summoning Circle
//!
//! Shown while the creature is being generated: a circle of glyphs with a
//! message underneath whose trailing ellipsis grows and shrinks
//! (`""`, `.`, `..`, `...`, `..`, `.`) every half second.

use std::time::Duration;

use crate::compositor::place_horizontal;
use crate::events::{Effect, Event, ItemId};
use crate::theme::{FOCUSED, PRIMARY};

/// Default frame interval
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

/// Number of ellipsis frames in one cycle
const FRAMES: usize = 6;

/// The circle drawn above the message
pub const CIRCLE_ART: &str = r"
            . o # o .
        o #     ?     # o
      #     .   ¿   .     #
    o     ?   #   #   ?     o
    #   .   #   o o   #   .   #
   ?  ¿   #   o  Æ  o   #   ¿  ?
    #   .   #   o o   #   .   #
    o     ?   #   #   ?     o
      #     .   ¿   .     #
        o #     ?     # o
            . o # o .
";

/// Animated circle with a summoning message
#[derive(Clone, Debug)]
pub struct SummoningCircle {
    id: ItemId,
    art: String,
    message: String,
    frame: usize,
    interval: Duration,
}

impl SummoningCircle {
    /// A circle using [`CIRCLE_ART`]
    pub fn new(id: ItemId, message: impl Into<String>, interval: Duration) -> Self {
        Self::with_art(id, CIRCLE_ART.trim_matches('\n'), message, interval)
    }

    /// A circle using custom art
    pub fn with_art(
        id: ItemId,
        art: impl Into<String>,
        message: impl Into<String>,
        interval: Duration,
    ) -> Self {
        Self {
            id,
            art: art.into(),
            message: message.into(),
            frame: 0,
            interval,
        }
    }

    /// Schedule the first frame
    pub fn start(&mut self) -> Vec<Effect> {
        vec![self.schedule()]
    }

    fn schedule(&self) -> Effect {
        Effect::after(self.interval, Event::CircleTick { item: self.id })
    }

    /// Handle a scheduler event
    pub fn update(&mut self, event: &Event) -> Vec<Effect> {
        match event {
            Event::CircleTick { item } if *item == self.id => {
                self.frame = (self.frame + 1) % FRAMES;
                vec![self.schedule()]
            }
            _ => Vec::new(),
        }
    }

    /// Item id
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Current animation frame
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Ellipsis for the current frame
    pub fn dots(&self) -> String {
        let count = if self.frame > 3 {
            FRAMES - self.frame
        } else {
            self.frame
        };
        ".".repeat(count)
    }

    /// The styled view, centered in `width`
    pub fn view(&self, width: usize) -> String {
        let art = PRIMARY.paint(&place_horizontal(width, &self.art));
        let message = place_horizontal(width, &self.message);
        let message = FOCUSED.paint(&format!("{}{}", message.trim_end(), self.dots()));
        format!("{art}\n\n{message}")
    }
}
