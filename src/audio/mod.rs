//! Audio subsystem using kira.
//!
//! This module provides:
//! - [`ClockSource`]: The playback-position abstraction the engine runs on
//! - [`SongClock`]: Real audio playback through kira
//! - [`WallClock`]: Silent fallback when audio output is unavailable
//! - [`click_sound`]: The synthesized metronome click

mod click;
mod clock;
mod song;

pub use click::{CLICK_FREQ_HZ, CLICK_LENGTH_MS, ClickSink, click_sound};
pub use clock::{ClockEvent, ClockSource, ManualClock, WallClock};
pub use song::SongClock;

use crate::model::Track;

/// Best available clock for a track: real playback when the audio stack
/// comes up, otherwise a silent wall clock over the fallback duration.
pub fn clock_for_track(track: &Track) -> Box<dyn ClockSource> {
    match SongClock::from_file(&track.audio_src) {
        Ok(clock) => Box::new(clock),
        Err(e) => {
            log::warn!("audio unavailable, running silent: {e:#}");
            Box::new(WallClock::new(track.fallback_duration_ms() as f64))
        }
    }
}
