//! Procedural sound effects.
//!
//! Every effect is a short exponential frequency sweep rendered into mono
//! `f32` samples. The game core only names the effect; a [`SoundSink`]
//! decides whether and how it is heard.

#[cfg(feature = "audio")]
mod rodio_sink;

#[cfg(feature = "audio")]
pub use rodio_sink::RodioSink;

use log::{debug, warn};
use std::f32::consts::TAU;

use crate::game::GameEvent;

pub const SAMPLE_RATE: u32 = 44_100;

/// Peak amplitude of generated sweeps
const VOLUME: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    Eat,
    Death,
    PowerUp,
}

impl SoundEffect {
    pub fn sweep(&self) -> Sweep {
        match self {
            SoundEffect::Eat => Sweep::new(200.0, 600.0, 0.1),
            SoundEffect::Death => Sweep::new(400.0, 100.0, 0.3),
            SoundEffect::PowerUp => Sweep::new(300.0, 900.0, 0.2),
        }
    }
}

impl From<&GameEvent> for SoundEffect {
    fn from(event: &GameEvent) -> Self {
        match event {
            GameEvent::Eat => SoundEffect::Eat,
            GameEvent::Death(_) => SoundEffect::Death,
            GameEvent::PowerUp(_) => SoundEffect::PowerUp,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration_secs: f32,
}

impl Sweep {
    pub fn new(start_hz: f32, end_hz: f32, duration_secs: f32) -> Self {
        Self {
            start_hz,
            end_hz,
            duration_secs,
        }
    }

    /// Instantaneous frequency at `t` seconds into the sweep
    pub fn frequency_at(&self, t: f32) -> f32 {
        let progress = (t / self.duration_secs).clamp(0.0, 1.0);
        self.start_hz * (self.end_hz / self.start_hz).powf(progress)
    }
}

/// Render a sweep to mono samples
pub fn synthesize_sweep(sweep: &Sweep, sample_rate: u32) -> Vec<f32> {
    let sample_count = (sample_rate as f32 * sweep.duration_secs) as usize;
    let mut samples = Vec::with_capacity(sample_count);
    let mut phase = 0.0f32;

    for i in 0..sample_count {
        let t = i as f32 / sample_rate as f32;
        samples.push(phase.sin() * VOLUME);
        phase = (phase + TAU * sweep.frequency_at(t) / sample_rate as f32) % TAU;
    }

    samples
}

/// Receives sound triggers from the game loop. Fire and forget.
pub trait SoundSink {
    fn play(&mut self, effect: SoundEffect);
}

/// Drops every sound; used when muted or when no device is available
#[derive(Debug, Default)]
pub struct SilentSink;

impl SoundSink for SilentSink {
    fn play(&mut self, effect: SoundEffect) {
        debug!("sound {:?} (muted)", effect);
    }
}

/// Pick the best available sink
pub fn open_sink(muted: bool) -> Box<dyn SoundSink> {
    if muted {
        return Box::new(SilentSink);
    }

    #[cfg(feature = "audio")]
    {
        match RodioSink::open() {
            Ok(sink) => return Box::new(sink),
            Err(err) => warn!("audio unavailable, continuing silently: {err:#}"),
        }
    }

    #[cfg(not(feature = "audio"))]
    warn!("built without the `audio` feature, sounds are disabled");

    Box::new(SilentSink)
}
