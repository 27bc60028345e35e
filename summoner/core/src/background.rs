//! Background Automaton
//!
//! A full-frame grid of decorative glyphs that drifts over time. Every cell
//! holds a glyph category from [`PALETTE`]. On each tick a cell takes the
//! category of a uniformly chosen member of its 3x3 neighborhood (itself
//! included, clipped at the edges), which makes patches of similar glyphs
//! grow, shrink and wander.
//!
//! A cell only draws a new glyph when its category changes, so stable
//! regions keep their exact characters from frame to frame.
//!
//! # Epochs
//!
//! Every dimension change re-seeds the grid and bumps the [`AnimationEpoch`].
//! Ticks are scheduled with the epoch they belong to; a tick from an older
//! epoch is dropped on arrival so two tick chains never run side by side.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::events::{Effect, Event};

/// Glyph categories; glyphs within a category are interchangeable
pub const PALETTE: [&[char]; 5] = [
    &['.', ',', '`'],
    &['?', '¿'],
    &['o'],
    &['Æ', 'À', 'Á'],
    &['#'],
];

/// Default tick cadence
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Generation counter of the background animation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnimationEpoch(u64);

impl AnimationEpoch {
    /// The following epoch
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw counter value
    pub fn value(self) -> u64 {
        self.0
    }
}

/// One background cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackgroundCell {
    /// Index into [`PALETTE`]
    pub category: usize,
    /// Glyph drawn from that category
    pub glyph: char,
}

impl BackgroundCell {
    fn random(rng: &mut impl Rng) -> Self {
        let category = rng.gen_range(0..PALETTE.len());
        Self::of_category(category, rng)
    }

    fn of_category(category: usize, rng: &mut impl Rng) -> Self {
        let glyphs = PALETTE[category];
        Self {
            category,
            glyph: glyphs[rng.gen_range(0..glyphs.len())],
        }
    }
}

/// Pick the next category among a cell and its neighbors
pub fn next_category(own: usize, neighbors: &[usize], rng: &mut impl Rng) -> usize {
    let pick = rng.gen_range(0..=neighbors.len());
    neighbors.get(pick).copied().unwrap_or(own)
}

/// The cell grid at one generation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tick: u64,
    cells: Vec<BackgroundCell>,
}

impl Grid {
    /// A freshly seeded grid with independent random categories
    pub fn seed(width: usize, height: usize, rng: &mut impl Rng) -> Self {
        let cells = (0..width * height)
            .map(|_| BackgroundCell::random(rng))
            .collect();
        Self {
            width,
            height,
            tick: 0,
            cells,
        }
    }

    /// Grid width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Generations evolved since seeding
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Cell at column `x`, row `y`
    pub fn cell(&self, x: usize, y: usize) -> Option<&BackgroundCell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    fn neighbors(&self, x: usize, y: usize) -> Vec<usize> {
        let mut out = Vec::with_capacity(8);
        for ny in y.saturating_sub(1)..=(y + 1).min(self.height - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(self.width - 1) {
                if (nx, ny) != (x, y) {
                    out.push(self.cells[ny * self.width + nx].category);
                }
            }
        }
        out
    }

    /// The next generation
    pub fn evolve(&self, rng: &mut impl Rng) -> Grid {
        let mut cells = Vec::with_capacity(self.cells.len());
        for y in 0..self.height {
            for x in 0..self.width {
                let current = self.cells[y * self.width + x];
                let category = next_category(current.category, &self.neighbors(x, y), rng);
                cells.push(if category == current.category {
                    current
                } else {
                    BackgroundCell::of_category(category, rng)
                });
            }
        }
        Grid {
            width: self.width,
            height: self.height,
            tick: self.tick + 1,
            cells,
        }
    }

    /// Glyph rows joined by newlines
    pub fn render(&self) -> String {
        if self.width == 0 {
            return "\n".repeat(self.height.saturating_sub(1));
        }
        self.cells
            .chunks(self.width)
            .map(|row| row.iter().map(|cell| cell.glyph).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A computed generation tagged with the epoch it belongs to
#[derive(Clone, Debug)]
pub struct BackgroundStep {
    /// Epoch the step was computed in
    pub epoch: AnimationEpoch,
    /// The new grid
    pub grid: Grid,
}

/// The animated background layer
pub struct Background {
    grid: Grid,
    epoch: AnimationEpoch,
    interval: Duration,
    rng: StdRng,
}

impl Background {
    /// Create a background with an entropy-seeded random source
    pub fn new(interval: Duration) -> Self {
        Self::with_rng(interval, StdRng::from_entropy())
    }

    /// Create a background with a deterministic random source
    pub fn with_seed(interval: Duration, seed: u64) -> Self {
        Self::with_rng(interval, StdRng::seed_from_u64(seed))
    }

    fn with_rng(interval: Duration, mut rng: StdRng) -> Self {
        Self {
            grid: Grid::seed(0, 0, &mut rng),
            epoch: AnimationEpoch::default(),
            interval,
            rng,
        }
    }

    /// Seed a `width` x `height` grid and schedule the first tick
    pub fn start(&mut self, width: usize, height: usize) -> Vec<Effect> {
        self.reseed(width, height)
    }

    fn reseed(&mut self, width: usize, height: usize) -> Vec<Effect> {
        self.epoch = self.epoch.next();
        self.grid = Grid::seed(width, height, &mut self.rng);
        tracing::info!(
            width,
            height,
            epoch = self.epoch.value(),
            "Background reseeded"
        );
        vec![self.schedule()]
    }

    fn schedule(&self) -> Effect {
        Effect::after(self.interval, Event::BackgroundTick { epoch: self.epoch })
    }

    /// Handle a scheduler event
    pub fn update(&mut self, event: &Event) -> Vec<Effect> {
        match event {
            Event::Resize { width, height } => {
                if (*width, *height) == (self.grid.width, self.grid.height) {
                    return Vec::new();
                }
                self.reseed(*width, *height)
            }
            Event::BackgroundTick { epoch } => {
                if *epoch != self.epoch {
                    tracing::debug!(
                        stale = epoch.value(),
                        current = self.epoch.value(),
                        "Dropping stale background tick"
                    );
                    return Vec::new();
                }
                let step = self.step();
                self.apply(step);
                vec![self.schedule()]
            }
            _ => Vec::new(),
        }
    }

    /// Compute the next generation without applying it
    pub fn step(&mut self) -> BackgroundStep {
        BackgroundStep {
            epoch: self.epoch,
            grid: self.grid.evolve(&mut self.rng),
        }
    }

    /// Apply a computed generation; returns false if it is stale
    pub fn apply(&mut self, step: BackgroundStep) -> bool {
        let same_size =
            step.grid.width == self.grid.width && step.grid.height == self.grid.height;
        if step.epoch != self.epoch || !same_size {
            return false;
        }
        self.grid = step.grid;
        true
    }

    /// Current epoch
    pub fn epoch(&self) -> AnimationEpoch {
        self.epoch
    }

    /// Current grid
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The background block
    pub fn view(&self) -> String {
        self.grid.render()
    }
}
