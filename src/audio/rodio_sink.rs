use anyhow::{Context, Result};
use log::warn;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};

use super::{SAMPLE_RATE, SoundEffect, SoundSink, synthesize_sweep};

/// Plays sweeps on the default output device
pub struct RodioSink {
    // Dropping the stream silences the handle
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl RodioSink {
    pub fn open() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("Failed to open default audio output")?;
        Ok(Self {
            _stream: stream,
            handle,
        })
    }
}

impl SoundSink for RodioSink {
    fn play(&mut self, effect: SoundEffect) {
        let samples = synthesize_sweep(&effect.sweep(), SAMPLE_RATE);
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
                sink.detach();
            }
            Err(err) => warn!("failed to play {:?}: {}", effect, err),
        }
    }
}
