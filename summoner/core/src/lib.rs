//! Summoner Core - Headless Rendering Engine for the Summoning Terminal
//!
//! This crate composites independently animated text layers into a single
//! styled terminal frame, completely independent of any terminal library.
//! The binary in `tui/` only translates terminal input into [`Event`]s,
//! executes the returned [`Effect`]s, and prints frames.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                        Terminal Surface                          │
//! │        crossterm input ─> Event      Effect ─> timers / audio    │
//! └───────────────────────────────┬──────────────────────────────────┘
//!                                 │
//! ┌───────────────────────────────┼──────────────────────────────────┐
//! │                         SUMMONER CORE                            │
//! │  ┌────────────────────────────┴───────────────────────────────┐  │
//! │  │                        Scheduler                           │  │
//! │  │  ┌────────────┐  ┌────────────────┐  ┌──────────────────┐  │  │
//! │  │  │ Background │  │ RevealingText  │  │ SummoningCircle  │  │  │
//! │  │  │ (automaton)│  │ + ResponseCtl  │  │                  │  │  │
//! │  │  └────────────┘  └────────────────┘  └──────────────────┘  │  │
//! │  └────────────────────────────┬───────────────────────────────┘  │
//! │                               │ render                           │
//! │  ┌────────────────────────────┴───────────────────────────────┐  │
//! │  │   FrameCompositor ─> LineCompositor ─> StyleLedger         │  │
//! │  └────────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Scheduler`]: owns the layers and dispatches events
//! - [`FrameCompositor`] / [`LineCompositor`]: overlay text on the background
//! - [`StyleLedger`]: tracks the active inline style
//! - [`Background`]: the cellular-automaton backdrop
//! - [`RevealingText`]: typewriter reveal with response gating
//! - [`Jukebox`]: sound playback state
//! - [`CreatureGenerator`]: deadline-bounded text generation
//!
//! # Quick Start
//!
//! ```ignore
//! use summoner_core::{Event, Key, ResponseControl, Scheduler, SummonConfig};
//!
//! let config = SummonConfig::default();
//! let mut scheduler = Scheduler::new(&config);
//! let mut effects = scheduler.start(80, 24);
//!
//! let intro = scheduler.message("You have entered.", ResponseControl::placeholder("Press Enter"));
//! effects.extend(scheduler.push_item(intro));
//!
//! effects.extend(scheduler.handle(&Event::Key(Key::Enter)));
//! println!("{}", scheduler.render()?);
//! ```
//!
//! # No Terminal Dependencies
//!
//! This crate has **zero** dependencies on crossterm, ratatui, or any other
//! terminal library, and never sleeps: waiting is expressed as
//! [`Effect::After`].

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_panics_doc)]

pub mod audio;
pub mod backend;
pub mod background;
pub mod circle;
pub mod compositor;
pub mod config;
pub mod events;
pub mod generator;
pub mod messages;
pub mod response;
pub mod reveal;
pub mod scheduler;
pub mod style;
pub mod theme;

pub use audio::{AudioOutput, Jukebox, SilentOutput, SoundEffect, SoundRequest};
pub use background::{AnimationEpoch, Background};
pub use circle::SummoningCircle;
pub use compositor::{CompositeError, Frame, FrameCompositor, Granularity, LineCompositor};
pub use config::{load_config, BackendConfig, ConfigError, SummonConfig};
pub use events::{Effect, Event, ItemId, Key};
pub use generator::CreatureGenerator;
pub use messages::{MessageKey, MessageProvider, PromptError};
pub use response::ResponseControl;
pub use reveal::{RevealState, RevealingText};
pub use scheduler::{Item, Scheduler};
pub use style::StyleLedger;
