//! Summoner TUI - Terminal surface for the summoning ritual
//!
//! A thin shell around `summoner-core`: terminal input becomes core
//! [`Event`](summoner_core::Event)s, the returned effects are executed with
//! tokio timers and the jukebox, and every frame is printed row by row.
//!
//! # Architecture
//!
//! - **Input**: crossterm events to core events
//! - **Ritual**: the narrative driver reacting to captured responses
//! - **App**: event loop and effect executor

pub mod app;
pub mod input;
pub mod ritual;

pub use app::App;
