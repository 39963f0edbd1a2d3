use std::sync::Arc;

use kira::Frame;
use kira::sound::static_sound::{StaticSoundData, StaticSoundSettings};

/// Something that can sound the metronome click. Implemented by the
/// real audio clock; tests count calls instead.
pub trait ClickSink {
    fn click(&mut self);
}

pub const CLICK_FREQ_HZ: f64 = 1200.0;
pub const CLICK_LENGTH_MS: f64 = 50.0;
const SAMPLE_RATE: u32 = 48_000;
const PEAK: f32 = 0.4;

/// Synthesize the metronome click used during test playback: a short
/// sine burst with a linear fade-out so it ends without a pop.
pub fn click_sound() -> StaticSoundData {
    let frames = click_frames(SAMPLE_RATE, CLICK_FREQ_HZ, CLICK_LENGTH_MS);
    StaticSoundData {
        sample_rate: SAMPLE_RATE,
        frames: Arc::from(frames),
        settings: StaticSoundSettings::default(),
        slice: None,
    }
}

fn click_frames(sample_rate: u32, freq_hz: f64, length_ms: f64) -> Vec<Frame> {
    let sample_count = (sample_rate as f64 * length_ms / 1000.0) as usize;
    (0..sample_count)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            let envelope = 1.0 - i as f32 / sample_count as f32;
            let sample = (t * freq_hz * std::f64::consts::TAU).sin() as f32;
            Frame::from_mono(sample * envelope * PEAK)
        })
        .collect()
}
