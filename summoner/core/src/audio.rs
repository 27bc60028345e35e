//! Sound Effects and the Jukebox
//!
//! Items never play audio themselves. They emit [`SoundRequest`]s as effects
//! and the executor hands them to a [`Jukebox`], which owns the two pieces of
//! shared audio state:
//!
//! - which sounds are currently playing (so a sound is not restarted over
//!   itself unless overlap is allowed)
//! - the last segment played of each segmented sound (so scroll sounds cycle
//!   through their segments)
//!
//! Actual output goes through the [`AudioOutput`] trait.

use std::collections::HashMap;
use std::time::{Duration, Instant};

/// The sound effects used by the ritual
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Single click
    Click,
    /// Dial-up modem handshake
    DialupModem,
    /// Two short beeps
    DoubleBeep,
    /// Segmented double buzz
    DoubleBuzz,
    /// High-pitched beep
    HighPitchedBeep,
    /// Long buzz
    LongBuzz,
    /// Long low-pitched beep
    LongLowPitchedBeep,
    /// Quiet key tap
    QuietTap,
    /// Segmented rhythmic clicks and buzzes
    RhythmicClicksAndBuzzes,
    /// Short buzz
    ShortBuzz,
    /// Short low-pitched beep
    ShortLowPitchedBeep,
    /// Key tap
    Tap,
}

impl SoundEffect {
    /// File name pattern; segmented sounds contain `%d`
    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Click => "click.wav",
            SoundEffect::DialupModem => "dialup_modem.wav",
            SoundEffect::DoubleBeep => "double_beep.wav",
            SoundEffect::DoubleBuzz => "double_buzz_%d.wav",
            SoundEffect::HighPitchedBeep => "high_pitched_beep.wav",
            SoundEffect::LongBuzz => "long_buzz.wav",
            SoundEffect::LongLowPitchedBeep => "long_low_pitched_beep.wav",
            SoundEffect::QuietTap => "quiet_tap.wav",
            SoundEffect::RhythmicClicksAndBuzzes => "rhythmic_clicks_and_buzzes_%d.wav",
            SoundEffect::ShortBuzz => "short_buzz.wav",
            SoundEffect::ShortLowPitchedBeep => "short_low_pitched_beep.wav",
            SoundEffect::Tap => "tap.wav",
        }
    }

    /// File name of one segment (unchanged for unsegmented sounds)
    pub fn segment_file(self, index: u32) -> String {
        self.file_name().replace("%d", &index.to_string())
    }

    /// Whether the sound is split into numbered segments
    pub fn is_segmented(self) -> bool {
        self.file_name().contains("%d")
    }
}

/// Which part of a sound to play
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SegmentSelect {
    /// The whole (unsegmented) file
    Whole,
    /// A fixed segment
    Index(u32),
    /// The segment after the last one played, wrapping after `count`
    Cycle {
        /// Number of segments, numbered from 1
        count: u32,
    },
}

/// A request to play a sound
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoundRequest {
    /// The sound
    pub effect: SoundEffect,
    /// Segment selection
    pub segment: SegmentSelect,
    /// Play even if the same sound is already playing
    pub allow_overlap: bool,
}

impl SoundRequest {
    /// Play the whole sound unless it is already playing
    pub fn once(effect: SoundEffect) -> Self {
        Self {
            effect,
            segment: SegmentSelect::Whole,
            allow_overlap: false,
        }
    }

    /// Play the whole sound, overlapping any running instance
    pub fn overlapping(effect: SoundEffect) -> Self {
        Self {
            allow_overlap: true,
            ..Self::once(effect)
        }
    }

    /// Play the next segment of a segmented sound
    pub fn cycling(effect: SoundEffect, count: u32) -> Self {
        Self {
            segment: SegmentSelect::Cycle { count },
            ..Self::once(effect)
        }
    }
}

/// Something that can play a sound file
pub trait AudioOutput: Send {
    /// Start playing `file`; returns how long the clip lasts
    fn play(&mut self, file: &str) -> anyhow::Result<Duration>;
}

/// Output that only logs what would be played
#[derive(Clone, Debug)]
pub struct SilentOutput {
    clip: Duration,
}

impl SilentOutput {
    /// Pretend every clip lasts `clip`
    pub fn new(clip: Duration) -> Self {
        Self { clip }
    }
}

impl Default for SilentOutput {
    fn default() -> Self {
        Self::new(Duration::from_millis(120))
    }
}

impl AudioOutput for SilentOutput {
    fn play(&mut self, file: &str) -> anyhow::Result<Duration> {
        tracing::trace!(file, "Sound");
        Ok(self.clip)
    }
}

/// Shared playback state plus an output
pub struct Jukebox {
    output: Box<dyn AudioOutput>,
    playing_until: HashMap<SoundEffect, Instant>,
    last_segment: HashMap<SoundEffect, u32>,
}

impl Jukebox {
    /// Create a jukebox around an output
    pub fn new(output: Box<dyn AudioOutput>) -> Self {
        Self {
            output,
            playing_until: HashMap::new(),
            last_segment: HashMap::new(),
        }
    }

    /// A jukebox that only logs
    pub fn silent() -> Self {
        Self::new(Box::new(SilentOutput::default()))
    }

    /// Whether `effect` is still playing at `now`
    pub fn is_playing(&self, effect: SoundEffect, now: Instant) -> bool {
        self.playing_until
            .get(&effect)
            .is_some_and(|until| *until > now)
    }

    /// The last segment played of `effect`, if any
    pub fn last_segment(&self, effect: SoundEffect) -> Option<u32> {
        self.last_segment.get(&effect).copied()
    }

    /// Forget the segment cycle of `effect`
    pub fn reset_cycle(&mut self, effect: SoundEffect) {
        self.last_segment.remove(&effect);
    }

    /// The segment a cycling request would play next
    pub fn next_segment(&self, effect: SoundEffect, count: u32) -> u32 {
        match self.last_segment(effect) {
            None => 1,
            Some(last) => last % count.max(1) + 1,
        }
    }

    /// Play a request; returns the file started, or `None` if skipped
    pub fn play(&mut self, request: &SoundRequest, now: Instant) -> Option<String> {
        let effect = request.effect;
        if self.is_playing(effect, now) && !request.allow_overlap {
            return None;
        }

        let segment = match request.segment {
            SegmentSelect::Whole => None,
            SegmentSelect::Index(index) => Some(index),
            SegmentSelect::Cycle { count } => Some(self.next_segment(effect, count)),
        };
        let file = match segment {
            Some(index) => effect.segment_file(index),
            None => effect.file_name().to_string(),
        };
        if let Some(index) = segment {
            self.last_segment.insert(effect, index);
        }

        match self.output.play(&file) {
            Ok(length) => {
                let until = now + length;
                let entry = self.playing_until.entry(effect).or_insert(until);
                *entry = (*entry).max(until);
                Some(file)
            }
            Err(e) => {
                tracing::warn!(file = %file, error = %e, "Failed to play sound");
                None
            }
        }
    }
}
