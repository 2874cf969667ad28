//! Synthesized sound effects.

use fundsp::prelude::*;
use rodio::{OutputStream, OutputStreamHandle, Sink, buffer::SamplesBuffer};
use tracing::warn;

const SAMPLE_RATE: u32 = 44_100;

pub struct Sound {
    // Dropping the stream stops playback.
    _stream: OutputStream,
    handle: OutputStreamHandle,
}

impl Sound {
    /// `None` when no audio device is available.
    pub fn open() -> Option<Self> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => Some(Self {
                _stream: stream,
                handle,
            }),
            Err(e) => {
                warn!(error = %e, "audio disabled");
                None
            }
        }
    }

    /// Falling sawtooth sweep, 400Hz to 80Hz, fading out over half a second.
    pub fn play_death(&self) {
        let sink = match Sink::try_new(&self.handle) {
            Ok(sink) => sink,
            Err(e) => {
                warn!(error = %e, "cannot play sound");
                return;
            }
        };

        let freq = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
        let gain = lfo(|t: f32| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
        let mut sound = (freq >> saw()) * gain;
        sound.set_sample_rate(SAMPLE_RATE as f64);

        let samples: Vec<f32> = (0..SAMPLE_RATE / 2).map(|_| sound.get_mono()).collect();
        sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples));
        sink.detach(); // Play in background
    }
}
