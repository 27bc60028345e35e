//! Main Application
//!
//! The App is the effect executor around the core scheduler:
//! 1. Converts terminal events to core events
//! 2. Hands each event to the scheduler, one at a time
//! 3. Executes the returned effects (timers, sounds, narrative)
//! 4. Prints the composited frame after every event

use std::collections::VecDeque;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use crossterm::cursor::MoveTo;
use crossterm::event::EventStream;
use crossterm::queue;
use crossterm::style::Print;
use futures::StreamExt;
use tokio::sync::mpsc;

use summoner_core::backend::{LlmBackend, OllamaBackend};
use summoner_core::{
    CreatureGenerator, Effect, Event, Jukebox, Key, MessageProvider, Scheduler, SoundEffect,
    SoundRequest, SummonConfig,
};

use crate::input;
use crate::ritual::{Ritual, RitualAction, Stage};

/// Work arriving from spawned tasks
#[derive(Debug)]
pub enum Incoming {
    /// A deferred event whose timer fired
    Event(Event),
    /// The generated creature description
    Description(String),
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    scheduler: Scheduler,
    ritual: Ritual,

    // === Collaborators ===
    jukebox: Jukebox,
    generator: CreatureGenerator,

    // === Queues ===
    /// Events dispatched by effects, drained before the next external event
    queue: VecDeque<Event>,
    inbox_tx: mpsc::UnboundedSender<Incoming>,
    inbox: mpsc::UnboundedReceiver<Incoming>,
}

impl App {
    /// Create an app talking to the configured Ollama server
    pub fn new(config: &SummonConfig) -> Self {
        let backend: Arc<dyn LlmBackend> = Arc::new(OllamaBackend::from_config(&config.backend));
        let generator = CreatureGenerator::new(
            backend,
            config.backend.model.clone(),
            config.generation_timeout(),
        );
        Self::with_generator(config, generator)
    }

    /// Create an app with an explicit generator
    pub fn with_generator(config: &SummonConfig, generator: CreatureGenerator) -> Self {
        let provider = match config.seed {
            Some(seed) => MessageProvider::with_seed(seed),
            None => MessageProvider::new(),
        };
        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        Self {
            running: true,
            scheduler: Scheduler::new(config),
            ritual: Ritual::new(provider, config.offerings),
            jukebox: Jukebox::silent(),
            generator,
            queue: VecDeque::new(),
            inbox_tx,
            inbox,
        }
    }

    /// Is the app still running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current ritual stage
    pub fn stage(&self) -> Stage {
        self.ritual.stage()
    }

    /// The startup beep
    pub fn chime(&mut self) {
        self.jukebox
            .play(&SoundRequest::once(SoundEffect::DoubleBeep), Instant::now());
    }

    /// Start the background and show the introduction
    ///
    /// Must be called inside a tokio runtime.
    pub fn start(&mut self, width: usize, height: usize) -> anyhow::Result<()> {
        tracing::info!(width, height, "Starting ritual");
        let mut effects = self.scheduler.start(width, height);
        effects.extend(self.ritual.begin(&mut self.scheduler));
        self.settle(effects)
    }

    /// Main event loop
    pub async fn run<W: Write>(&mut self, out: &mut W) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        self.draw(out)?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events first
                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => {
                        if let Some(event) = input::translate(&event) {
                            self.dispatch(event)?;
                        }
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => self.running = false,
                },

                Some(incoming) = self.inbox.recv() => self.receive(incoming)?,
            }

            if self.running {
                self.draw(out)?;
            }
        }

        Ok(())
    }

    /// Handle one message from a spawned task
    pub fn receive(&mut self, incoming: Incoming) -> anyhow::Result<()> {
        match incoming {
            Incoming::Event(event) => self.dispatch(event),
            Incoming::Description(description) => {
                let effects = self.ritual.on_description(&mut self.scheduler, description);
                self.settle(effects)
            }
        }
    }

    /// Wait for the next message from a spawned task
    pub async fn next_incoming(&mut self) -> Option<Incoming> {
        self.inbox.recv().await
    }

    /// Hand one event to the scheduler and settle its effects
    pub fn dispatch(&mut self, event: Event) -> anyhow::Result<()> {
        if matches!(event, Event::Key(Key::Esc | Key::Interrupt)) {
            tracing::info!("Quit requested");
            self.running = false;
            return Ok(());
        }
        let effects = self.scheduler.handle(&event);
        self.settle(effects)
    }

    /// Execute effects, then drain dispatched events
    fn settle(&mut self, effects: Vec<Effect>) -> anyhow::Result<()> {
        self.execute(effects)?;
        while let Some(event) = self.queue.pop_front() {
            let effects = self.scheduler.handle(&event);
            self.execute(effects)?;
        }
        Ok(())
    }

    fn execute(&mut self, effects: Vec<Effect>) -> anyhow::Result<()> {
        for effect in effects {
            match effect {
                Effect::After { delay, event } => {
                    let tx = self.inbox_tx.clone();
                    tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(Incoming::Event(event));
                    });
                }
                Effect::Dispatch(event) => self.queue.push_back(event),
                Effect::PlaySound(request) => {
                    self.jukebox.play(&request, Instant::now());
                }
                Effect::ResetSoundCycle(sound) => self.jukebox.reset_cycle(sound),
                Effect::Respond { response, .. } => {
                    let action = self.ritual.on_response(&mut self.scheduler, &response)?;
                    self.perform(action)?;
                }
            }
        }
        Ok(())
    }

    fn perform(&mut self, action: RitualAction) -> anyhow::Result<()> {
        match action {
            RitualAction::Continue(effects) => self.execute(effects),
            RitualAction::Summon { effects, offerings } => {
                self.execute(effects)?;
                let generator = self.generator.clone();
                let tx = self.inbox_tx.clone();
                tokio::spawn(async move {
                    let description = generator.generate(&offerings).await;
                    let _ = tx.send(Incoming::Description(description));
                });
                Ok(())
            }
            RitualAction::Finish => {
                self.running = false;
                Ok(())
            }
        }
    }

    /// Print the current frame; a mismatched frame is logged and skipped
    fn draw<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        match self.scheduler.render() {
            Ok(frame) => {
                for (row, line) in frame.rows().iter().enumerate() {
                    let row = u16::try_from(row)?;
                    queue!(out, MoveTo(0, row), Print(line))?;
                }
                out.flush()?;
            }
            Err(e) => tracing::warn!(error = %e, "Skipping frame"),
        }
        Ok(())
    }
}
