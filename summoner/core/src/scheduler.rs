//! Cooperative Scheduler
//!
//! Owns everything on screen: the animated background, the ordered list of
//! foreground items, the terminal size and the responses captured so far.
//!
//! Each event is handled to completion before the next one:
//!
//! 1. a resize updates the stored size first
//! 2. the background sees the event
//! 3. every item sees the event, in creation order
//!
//! Follow-up work comes back as a flat `Vec<Effect>` for the executor. A
//! frame can be rendered after any event with [`Scheduler::render`].

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::background::{AnimationEpoch, Background};
use crate::circle::SummoningCircle;
use crate::compositor::{center_vertically, CompositeError, Frame, FrameCompositor, Granularity};
use crate::config::SummonConfig;
use crate::events::{Effect, Event, ItemId};
use crate::response::ResponseControl;
use crate::reveal::RevealingText;
use crate::theme::BACKDROP;

/// A foreground item
#[derive(Clone, Debug)]
pub enum Item {
    /// Typewriter message with a response control
    Reveal(RevealingText),
    /// Summoning circle animation
    Circle(SummoningCircle),
}

impl Item {
    /// Item id
    pub fn id(&self) -> ItemId {
        match self {
            Item::Reveal(text) => text.id(),
            Item::Circle(circle) => circle.id(),
        }
    }

    fn start(&mut self) -> Vec<Effect> {
        match self {
            Item::Reveal(text) => text.start(),
            Item::Circle(circle) => circle.start(),
        }
    }

    fn update(&mut self, event: &Event) -> Vec<Effect> {
        match self {
            Item::Reveal(text) => text.update(event),
            Item::Circle(circle) => circle.update(event),
        }
    }

    /// Styled view wrapped to `width`
    pub fn view(&self, width: usize) -> String {
        match self {
            Item::Reveal(text) => text.view(width),
            Item::Circle(circle) => circle.view(width),
        }
    }
}

/// Root of the update loop
pub struct Scheduler {
    width: usize,
    height: usize,
    background: Background,
    items: Vec<Item>,
    responses: Vec<String>,
    next_id: u64,
    granularity: Granularity,
    reveal_interval: Duration,
    circle_interval: Duration,
    rng: StdRng,
}

impl Scheduler {
    /// Create a scheduler from the runtime config
    pub fn new(config: &SummonConfig) -> Self {
        let (background, rng) = match config.seed {
            Some(seed) => (
                Background::with_seed(config.background_interval(), seed),
                StdRng::seed_from_u64(seed.wrapping_add(1)),
            ),
            None => (
                Background::new(config.background_interval()),
                StdRng::from_entropy(),
            ),
        };
        Self {
            width: 0,
            height: 0,
            background,
            items: Vec::new(),
            responses: Vec::new(),
            next_id: 0,
            granularity: Granularity::Double,
            reveal_interval: config.reveal_interval(),
            circle_interval: config.circle_interval(),
            rng,
        }
    }

    /// Use a different transparency granularity
    #[must_use]
    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Set the initial size and start the background
    pub fn start(&mut self, width: usize, height: usize) -> Vec<Effect> {
        self.width = width;
        self.height = height;
        self.background.start(width, height)
    }

    fn next_item_id(&mut self) -> ItemId {
        self.next_id += 1;
        ItemId(self.next_id)
    }

    /// Build a typewriter message (not yet scheduled)
    pub fn message(&mut self, text: impl Into<String>, control: ResponseControl) -> Item {
        let id = self.next_item_id();
        Item::Reveal(RevealingText::new(
            id,
            text,
            control,
            self.reveal_interval,
            &mut self.rng,
        ))
    }

    /// Build a summoning circle (not yet scheduled)
    pub fn circle(&mut self, message: impl Into<String>) -> Item {
        let id = self.next_item_id();
        Item::Circle(SummoningCircle::new(id, message, self.circle_interval))
    }

    /// Append an item and start it
    pub fn push_item(&mut self, mut item: Item) -> Vec<Effect> {
        let effects = item.start();
        tracing::debug!(item = %item.id(), "Item added");
        self.items.push(item);
        effects
    }

    /// Replace every item and start the new ones
    pub fn replace_items(&mut self, items: Vec<Item>) -> Vec<Effect> {
        self.items.clear();
        items
            .into_iter()
            .flat_map(|item| self.push_item(item))
            .collect()
    }

    /// Dispatch one event to the background and every item
    pub fn handle(&mut self, event: &Event) -> Vec<Effect> {
        if let Event::Resize { width, height } = event {
            self.width = *width;
            self.height = *height;
        }

        let mut effects = self.background.update(event);
        for item in &mut self.items {
            effects.extend(item.update(event));
        }

        if let Event::ResponseCaptured { item, response } = event {
            self.responses.push(response.clone());
            effects.push(Effect::Respond {
                item: *item,
                response: response.clone(),
            });
        }

        effects
    }

    /// The foreground block: items stacked, one blank line after each
    pub fn foreground(&self) -> String {
        let block = self
            .items
            .iter()
            .map(|item| format!("{}\n", item.view(self.width)))
            .collect::<Vec<_>>()
            .join("\n");

        // Keep the newest lines when the stack outgrows the screen
        let lines: Vec<&str> = block.split('\n').collect();
        if lines.len() > self.height {
            return lines[lines.len() - self.height..].join("\n");
        }
        center_vertically(self.height, &block)
    }

    /// Composite the current frame
    ///
    /// # Errors
    ///
    /// Returns [`CompositeError::DimensionMismatch`] if the background does
    /// not match the stored terminal size.
    pub fn render(&self) -> Result<Frame, CompositeError> {
        FrameCompositor::new(self.width, self.height, BACKDROP.token()).place_overlay(
            &self.foreground(),
            &self.background.view(),
            self.granularity,
        )
    }

    /// Terminal width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Terminal height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Items in creation order
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Responses captured so far, in order
    pub fn responses(&self) -> &[String] {
        &self.responses
    }

    /// The background layer
    pub fn background(&self) -> &Background {
        &self.background
    }

    /// Current background epoch
    pub fn epoch(&self) -> AnimationEpoch {
        self.background.epoch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Key;
    use crate::reveal::RevealState;
    use crate::style::display_width;
    use pretty_assertions::assert_eq;

    fn scheduler() -> Scheduler {
        let config = SummonConfig {
            seed: Some(3),
            ..Default::default()
        };
        Scheduler::new(&config)
    }

    fn reveal_state(scheduler: &Scheduler, index: usize) -> RevealState {
        match &scheduler.items()[index] {
            Item::Reveal(text) => text.state(),
            Item::Circle(_) => panic!("expected a message"),
        }
    }

    #[test]
    fn test_item_ids_increase() {
        let mut scheduler = scheduler();
        let a = scheduler.message("a", ResponseControl::placeholder("go"));
        let b = scheduler.circle("Summoning");
        assert!(a.id() < b.id());
    }

    #[test]
    fn test_push_item_returns_start_effects() {
        let mut scheduler = scheduler();
        let item = scheduler.message("abc", ResponseControl::placeholder("go"));
        let id = item.id();
        let effects = scheduler.push_item(item);
        assert_eq!(
            effects,
            vec![Effect::after(
                Duration::from_millis(10),
                Event::RevealTick { item: id }
            )]
        );
    }

    #[test]
    fn test_replace_items() {
        let mut scheduler = scheduler();
        let first = scheduler.message("one", ResponseControl::placeholder("go"));
        scheduler.push_item(first);
        let circle = scheduler.circle("Summoning");
        let effects = scheduler.replace_items(vec![circle]);
        assert_eq!(scheduler.items().len(), 1);
        assert!(matches!(scheduler.items()[0], Item::Circle(_)));
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn test_resize_reaches_background_first() {
        let mut scheduler = scheduler();
        scheduler.start(20, 5);
        let before = scheduler.epoch();
        let effects = scheduler.handle(&Event::Resize {
            width: 30,
            height: 6,
        });
        assert_eq!((scheduler.width(), scheduler.height()), (30, 6));
        assert_eq!(scheduler.epoch(), before.next());
        assert_eq!(
            effects[0],
            Effect::after(
                Duration::from_millis(100),
                Event::BackgroundTick {
                    epoch: scheduler.epoch()
                }
            )
        );
    }

    #[test]
    fn test_enter_reaches_every_item() {
        let mut scheduler = scheduler();
        scheduler.start(40, 10);
        let first = scheduler.message("first", ResponseControl::placeholder("go"));
        let second = scheduler.message("second", ResponseControl::placeholder("go"));
        scheduler.push_item(first);
        scheduler.push_item(second);

        scheduler.handle(&Event::Key(Key::Enter));
        assert_eq!(reveal_state(&scheduler, 0), RevealState::AwaitingResponse);
        assert_eq!(reveal_state(&scheduler, 1), RevealState::AwaitingResponse);
    }

    #[test]
    fn test_response_captured_is_recorded() {
        let mut scheduler = scheduler();
        let effects = scheduler.handle(&Event::ResponseCaptured {
            item: ItemId(7),
            response: "moss".to_string(),
        });
        assert_eq!(scheduler.responses(), ["moss".to_string()]);
        assert_eq!(
            effects,
            vec![Effect::Respond {
                item: ItemId(7),
                response: "moss".to_string(),
            }]
        );
    }

    #[test]
    fn test_render_has_frame_dimensions() {
        let mut scheduler = scheduler();
        scheduler.start(30, 8);
        let item = scheduler.message("The circle hums", ResponseControl::placeholder("go"));
        scheduler.push_item(item);
        scheduler.handle(&Event::Key(Key::Enter));

        let frame = scheduler.render().unwrap();
        assert_eq!(frame.rows().len(), 8);
        assert!(frame.rows().iter().all(|row| display_width(row) == 30));
        assert!(frame
            .plain_rows()
            .iter()
            .any(|row| row.starts_with("The circle hums")));
    }

    #[test]
    fn test_tall_foreground_keeps_newest_lines() {
        let mut scheduler = scheduler();
        scheduler.start(20, 3);
        for text in ["one", "two", "three"] {
            let item = scheduler.message(text, ResponseControl::placeholder("go"));
            scheduler.push_item(item);
        }
        scheduler.handle(&Event::Key(Key::Enter));
        scheduler.handle(&Event::Key(Key::Enter));

        let rows = scheduler.render().unwrap().plain_rows();
        assert!(rows.iter().any(|row| row.starts_with("three")));
        assert!(!rows.iter().any(|row| row.starts_with("one")));
    }

    #[test]
    fn test_render_before_start_is_empty() {
        let scheduler = scheduler();
        let frame = scheduler.render().unwrap();
        assert!(frame.rows().is_empty());
    }
}
