//! The summoning ritual
//!
//! Narrative driver on top of the scheduler. It reacts to every captured
//! response and decides what appears next:
//!
//! ```text
//! Intro -> BeginRitual -> Offering(1..=n) -> Summoning -> Revealed -> Finished
//! ```
//!
//! The creature description is produced out of band; the ritual only asks
//! for it ([`RitualAction::Summon`]) and later receives the text through
//! [`Ritual::on_description`].

use summoner_core::messages::message;
use summoner_core::{
    Effect, MessageKey, MessageProvider, PromptError, ResponseControl, Scheduler, SoundEffect,
    SoundRequest,
};

/// Where the player is in the ritual
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing shown yet
    NotStarted,
    /// The introduction text
    Intro,
    /// "You begin the ritual..."
    BeginRitual,
    /// Offering prompt number `asked` (1-based)
    Offering {
        /// Prompts asked so far
        asked: usize,
    },
    /// Circle spinning, description being generated
    Summoning,
    /// Description shown
    Revealed,
    /// The player left the circle
    Finished,
}

/// What the app should do after a response
#[derive(Debug, PartialEq)]
pub enum RitualAction {
    /// Execute these effects
    Continue(Vec<Effect>),
    /// Execute these effects and start describing the creature
    Summon {
        /// Effects from the new screen
        effects: Vec<Effect>,
        /// The player's offerings, in order
        offerings: Vec<String>,
    },
    /// Leave the app
    Finish,
}

/// Narrative state machine
pub struct Ritual {
    provider: MessageProvider,
    offerings_wanted: usize,
    offerings: Vec<String>,
    stage: Stage,
}

impl Ritual {
    /// A ritual asking for `offerings_wanted` offerings
    pub fn new(provider: MessageProvider, offerings_wanted: usize) -> Self {
        Self {
            provider,
            offerings_wanted: offerings_wanted.max(1),
            offerings: Vec::new(),
            stage: Stage::NotStarted,
        }
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Offerings collected so far
    pub fn offerings(&self) -> &[String] {
        &self.offerings
    }

    /// Show the introduction
    pub fn begin(&mut self, scheduler: &mut Scheduler) -> Vec<Effect> {
        self.stage = Stage::Intro;
        Self::show(scheduler, MessageKey::Intro)
    }

    /// React to a captured response
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Exhausted`] when no unused offering prompt is
    /// left.
    pub fn on_response(
        &mut self,
        scheduler: &mut Scheduler,
        response: &str,
    ) -> Result<RitualAction, PromptError> {
        let action = match self.stage {
            Stage::Intro => {
                self.stage = Stage::BeginRitual;
                RitualAction::Continue(Self::show(scheduler, MessageKey::BeginRitual))
            }
            Stage::BeginRitual => {
                scheduler.replace_items(Vec::new());
                RitualAction::Continue(self.ask(scheduler, 1)?)
            }
            Stage::Offering { asked } => {
                self.offerings.push(response.to_string());
                tracing::info!(offering = asked, "Offering accepted");
                if asked < self.offerings_wanted {
                    RitualAction::Continue(self.ask(scheduler, asked + 1)?)
                } else {
                    self.summon(scheduler)
                }
            }
            Stage::Revealed => {
                self.stage = Stage::Finished;
                tracing::info!("Ritual finished");
                RitualAction::Finish
            }
            Stage::NotStarted | Stage::Summoning | Stage::Finished => {
                RitualAction::Continue(Vec::new())
            }
        };
        Ok(action)
    }

    /// Show the creature description once it is ready
    pub fn on_description(&mut self, scheduler: &mut Scheduler, description: String) -> Vec<Effect> {
        if self.stage != Stage::Summoning {
            tracing::debug!(stage = ?self.stage, "Ignoring late description");
            return Vec::new();
        }
        self.stage = Stage::Revealed;
        let item = scheduler.message(
            description,
            ResponseControl::placeholder(message(MessageKey::Farewell)),
        );
        scheduler.replace_items(vec![item])
    }

    fn show(scheduler: &mut Scheduler, key: MessageKey) -> Vec<Effect> {
        let item = scheduler.message(
            message(key),
            ResponseControl::placeholder(message(MessageKey::Continue)),
        );
        scheduler.replace_items(vec![item])
    }

    fn ask(&mut self, scheduler: &mut Scheduler, asked: usize) -> Result<Vec<Effect>, PromptError> {
        let prompt = self.provider.get_prompt()?;
        self.stage = Stage::Offering { asked };
        let item = scheduler.message(prompt, ResponseControl::input());
        Ok(scheduler.push_item(item))
    }

    fn summon(&mut self, scheduler: &mut Scheduler) -> RitualAction {
        self.stage = Stage::Summoning;
        tracing::info!(offerings = self.offerings.len(), "Summoning");
        let circle = scheduler.circle(message(MessageKey::Summoning));
        let mut effects = vec![Effect::PlaySound(SoundRequest::once(SoundEffect::DialupModem))];
        effects.extend(scheduler.replace_items(vec![circle]));
        RitualAction::Summon {
            effects,
            offerings: self.offerings.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use summoner_core::{Item, SummonConfig};

    fn setup(offerings: usize) -> (Ritual, Scheduler) {
        let config = SummonConfig {
            seed: Some(5),
            ..Default::default()
        };
        let mut scheduler = Scheduler::new(&config);
        scheduler.start(60, 20);
        (
            Ritual::new(MessageProvider::with_seed(5), offerings),
            scheduler,
        )
    }

    fn text_of(scheduler: &Scheduler, index: usize) -> String {
        match &scheduler.items()[index] {
            Item::Reveal(text) => text.text().to_string(),
            Item::Circle(_) => "<circle>".to_string(),
        }
    }

    #[test]
    fn test_begin_shows_intro() {
        let (mut ritual, mut scheduler) = setup(2);
        let effects = ritual.begin(&mut scheduler);
        assert_eq!(ritual.stage(), Stage::Intro);
        assert_eq!(effects.len(), 1);
        assert_eq!(text_of(&scheduler, 0), message(MessageKey::Intro));
    }

    #[test]
    fn test_offerings_stack_up() {
        let (mut ritual, mut scheduler) = setup(2);
        ritual.begin(&mut scheduler);
        ritual.on_response(&mut scheduler, "").unwrap();
        assert_eq!(ritual.stage(), Stage::BeginRitual);
        assert_eq!(text_of(&scheduler, 0), message(MessageKey::BeginRitual));

        ritual.on_response(&mut scheduler, "").unwrap();
        assert_eq!(ritual.stage(), Stage::Offering { asked: 1 });
        assert_eq!(scheduler.items().len(), 1);

        ritual.on_response(&mut scheduler, "salt").unwrap();
        assert_eq!(ritual.stage(), Stage::Offering { asked: 2 });
        assert_eq!(scheduler.items().len(), 2);
        assert_ne!(text_of(&scheduler, 0), text_of(&scheduler, 1));
    }

    #[test]
    fn test_last_offering_summons() {
        let (mut ritual, mut scheduler) = setup(1);
        ritual.begin(&mut scheduler);
        ritual.on_response(&mut scheduler, "").unwrap();
        ritual.on_response(&mut scheduler, "").unwrap();

        let action = ritual.on_response(&mut scheduler, "a bent nail").unwrap();
        let RitualAction::Summon { effects, offerings } = action else {
            panic!("expected a summon");
        };
        assert_eq!(offerings, vec!["a bent nail".to_string()]);
        assert_eq!(
            effects[0],
            Effect::PlaySound(SoundRequest::once(SoundEffect::DialupModem))
        );
        assert_eq!(ritual.stage(), Stage::Summoning);
        assert_eq!(text_of(&scheduler, 0), "<circle>");
    }

    #[test]
    fn test_description_then_farewell() {
        let (mut ritual, mut scheduler) = setup(1);
        ritual.begin(&mut scheduler);
        for response in ["", "", "ash"] {
            ritual.on_response(&mut scheduler, response).unwrap();
        }

        let effects = ritual.on_description(&mut scheduler, "It has many knees.".to_string());
        assert_eq!(effects.len(), 1);
        assert_eq!(ritual.stage(), Stage::Revealed);
        assert_eq!(text_of(&scheduler, 0), "It has many knees.");

        assert_eq!(
            ritual.on_response(&mut scheduler, "").unwrap(),
            RitualAction::Finish
        );
        assert_eq!(ritual.stage(), Stage::Finished);
    }

    #[test]
    fn test_description_outside_summoning_is_ignored() {
        let (mut ritual, mut scheduler) = setup(1);
        ritual.begin(&mut scheduler);
        let effects = ritual.on_description(&mut scheduler, "too early".to_string());
        assert!(effects.is_empty());
        assert_eq!(ritual.stage(), Stage::Intro);
    }

    #[test]
    fn test_prompt_exhaustion_is_an_error() {
        let (mut ritual, mut scheduler) = setup(usize::MAX);
        ritual.begin(&mut scheduler);
        ritual.on_response(&mut scheduler, "").unwrap();

        let mut result = ritual.on_response(&mut scheduler, "");
        while let Ok(RitualAction::Continue(_)) = result {
            result = ritual.on_response(&mut scheduler, "more");
        }
        assert!(matches!(result, Err(PromptError::Exhausted { .. })));
    }
}
