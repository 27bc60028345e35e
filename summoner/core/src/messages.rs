//! Ritual Texts and Offering Prompts
//!
//! Fixed narrative texts keyed by [`MessageKey`], plus the pool of offering
//! prompts the player answers. [`MessageProvider`] hands out prompts at
//! random without repeats; asking for more prompts than exist is a hard
//! error.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

/// Errors from the prompt provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// Every prompt has already been handed out
    #[error("no more prompts available ({total} used)")]
    Exhausted {
        /// Size of the prompt pool
        total: usize,
    },
}

/// Keys of the fixed narrative texts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKey {
    /// Opening text
    Intro,
    /// Shown before the offerings
    BeginRitual,
    /// Instruction sent to the text generator ahead of the offerings
    CreatureDescriptionPrompt,
    /// Shown when the creature could not be described
    SummoningError,
    /// Placeholder under messages without an input
    Continue,
    /// Message under the summoning circle
    Summoning,
    /// Closing placeholder after the creature is revealed
    Farewell,
}

/// The text for `key`
pub fn message(key: MessageKey) -> &'static str {
    match key {
        MessageKey::Intro => {
            "The corrupted data writhes its way out of the disk, a gateway to a hidden realm. \
             You have entered the Floppy Disk of Forbidden Creatures. And you know you have come \
             here for a purpose - to summon a creature beyond your comprehension."
        }
        MessageKey::BeginRitual => "You begin the ritual...",
        MessageKey::CreatureDescriptionPrompt => {
            "You are the narrator of a dark, surreal summoning ritual. In one vivid paragraph \
             of no more than 120 words, describe the creature that emerges from the summoning \
             circle, drawing on these offerings: "
        }
        MessageKey::SummoningError => {
            "The circle flickers and goes dark. Whatever you called upon has refused to answer, \
             and only silence remains where a creature should be."
        }
        MessageKey::Continue => "Press Enter to continue",
        MessageKey::Summoning => "Summoning",
        MessageKey::Farewell => "Press Enter to leave the circle",
    }
}

/// Offering prompts
pub const PROMPTS: [&str; 24] = [
    "A plant of medicinal value, key to the ritual's purpose, is needed. Which do you choose?",
    "You feel an irresistible desire to relinquish a precious stone from your collection. What color is it?",
    "A token of your devotion rests in your hands, ready to be placed upon the altar. What is it?",
    "In your pocket is a lock of hair, plucked from the head of a loved one, ready to be offered to the abyss. \
     What color and texture is the lock of hair?",
    "As required for the ritual, you have prepared a small canvas from the shed skin of a viper. What is \
     inscribed upon it?",
    "In your shaking hand, you raise a mirror of polished silver in front of the altar. In it, you catch a \
     glimpse of your own face. What expression does it show?",
    "A vial of iridescent liquid, which you've harvested from a bioluminescent deep-sea creature, illuminates \
     the summoning circle. What color does it glow?",
    "You have formed a crude sculpture from a nearby spring of boiling mud, its fumes weaving an acrid \
     olfactory tapestry. What is its appearance?",
    "Your nostrils are filled with the fragrance of burning incense, which you've prepared from powdered bone \
     and dried herbs. You hope it will serve its purpose in cleansing the altar. What fragrance does it produce?",
    "With a chipped obsidian blade, you carve symbols of summoning into the barren earth. What do the symbols \
     resemble?",
    "You carefully place an effigy, crafted from the gnarled roots of a hanged man's tree, in its spot on the \
     altar. What is the effigy's posture?",
    "On a flute carved from the femur of a vulture, you play a haunting melody. What is its tempo?",
    "A chalice, filled with the brackish water from a stagnant swamp, brims with the potential for \
     otherworldly power. You gulp down as much as you can, hoping it is enough. What does it taste like?",
    "You shed a single, perfect teardrop onto the summoning circle. What caused the tear to form?",
    "You produce from your pack a tome of forbidden knowledge, crackling with eldritch energy. What is its \
     title?",
    "A single grain of sand, originating from the shores of a forgotten land, holds the weight of countless \
     eons. Where did you find it?",
    "With a pang of regret, you open up your hand to drop your most precious possession into the summoning \
     circle. What is the object's texture?",
    "The lingering scent of a nearly forgotten dream, which you've trapped within a sealed glass vial, gives \
     power to the ritual. What was the dream about?",
    "As an offering, you bring the preserved remains of a small creature to the altar. What part of the \
     creature is missing?",
    "A shard of bone, carved with intricate runes that hum with power, serves as a conduit for otherworldly \
     energies. From what creature's bone did you take the shard?",
    "A single drop of blood, drawn from the summoner's own finger, seals the pact with the entity being \
     called forth. What is depicted on the handle of the knife you used to draw the blood?",
    "A single word, which you whisper into the darkness, reverberates with the power to bridge the gap \
     between worlds. What is the word?",
    "A rusted iron nail, driven into the floor of the summoning circle, binds the entity to the physical \
     realm. How many strikes of the hammer did it take you to secure it?",
    "A piece of charcoal, which you used to draw the summoning circle upon the ground, crumbles into dust as \
     the ritual nears completion. What shape is the charcoal?",
];

/// Hands out narrative texts and unique offering prompts
pub struct MessageProvider {
    used: Vec<bool>,
    rng: StdRng,
}

impl MessageProvider {
    /// A provider with an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A provider with a deterministic random source
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            used: vec![false; PROMPTS.len()],
            rng,
        }
    }

    /// The text for `key`
    pub fn get_message(&self, key: MessageKey) -> &'static str {
        message(key)
    }

    /// A random prompt that has not been handed out before
    pub fn get_prompt(&mut self) -> Result<&'static str, PromptError> {
        let unused: Vec<usize> = (0..PROMPTS.len()).filter(|&i| !self.used[i]).collect();
        if unused.is_empty() {
            return Err(PromptError::Exhausted {
                total: PROMPTS.len(),
            });
        }
        let index = unused[self.rng.gen_range(0..unused.len())];
        self.used[index] = true;
        Ok(PROMPTS[index])
    }

    /// Prompts still available
    pub fn remaining(&self) -> usize {
        self.used.iter().filter(|used| !**used).count()
    }
}

impl Default for MessageProvider {
    fn default() -> Self {
        Self::new()
    }
}
