use thiserror::Error;

use crate::audio::{ClockEvent, ClockSource};
use crate::config::{Difficulty, GameConfig};
use crate::game::{Judgment, RunEngine, RunSummary, StartError, TickReport};
use crate::model::Track;

/// Tactile feedback on judgments. The default does nothing; platforms
/// with a vibration motor plug their own in.
pub trait Haptics {
    fn pulse(&mut self, judgment: Judgment);
}

/// No-op haptics for platforms without vibration support.
#[derive(Debug, Default)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&mut self, _judgment: Judgment) {}
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no track selected")]
    NoTrackSelected,
    #[error(transparent)]
    Start(#[from] StartError),
}

/// Ties a clock source to a run engine: polls playback, feeds elapsed
/// time into the engine and routes taps and lifecycle events.
///
/// All game time comes from the clock's playback position. Until the
/// clock reports that playback actually started, taps are dropped and
/// the engine never ticks.
pub struct GameSession<C: ClockSource, H: Haptics = NoHaptics> {
    clock: C,
    engine: RunEngine,
    haptics: H,
    duration_ms: Option<f64>,
    stopped: bool,
}

impl<C: ClockSource> GameSession<C, NoHaptics> {
    pub fn start(
        track: Option<Track>,
        config: GameConfig,
        difficulty: Difficulty,
        clock: C,
    ) -> Result<Self, SessionError> {
        Self::start_with_haptics(track, config, difficulty, clock, NoHaptics)
    }
}

impl<C: ClockSource, H: Haptics> GameSession<C, H> {
    pub fn start_with_haptics(
        track: Option<Track>,
        config: GameConfig,
        difficulty: Difficulty,
        mut clock: C,
        haptics: H,
    ) -> Result<Self, SessionError> {
        let track = track.ok_or(SessionError::NoTrackSelected)?;
        let engine = RunEngine::new(track, config, difficulty)?;
        clock.play();
        Ok(Self {
            clock,
            engine,
            haptics,
            duration_ms: None,
            stopped: false,
        })
    }

    pub fn engine(&self) -> &RunEngine {
        &self.engine
    }

    pub fn clock(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Drive one frame: drain clock events, then advance the engine to
    /// the current playback position.
    pub fn update(&mut self) -> Option<TickReport> {
        for event in self.clock.poll() {
            match event {
                ClockEvent::Started => log::debug!("playback started"),
                ClockEvent::MetadataLoaded(duration_ms) => {
                    self.duration_ms = Some(duration_ms);
                }
                ClockEvent::Ended => self.engine.notify_track_ended(),
            }
        }
        let elapsed_ms = self.clock.position_ms()?;
        let duration = self.duration_ms.or_else(|| self.clock.duration_ms());
        Some(self.engine.tick(elapsed_ms, duration))
    }

    /// Route a tap at the current playback position. Taps before
    /// playback starts or after the run ends are dropped.
    pub fn tap(&mut self) -> Option<Judgment> {
        let elapsed_ms = self.clock.position_ms()?;
        let judgment = self.engine.tap(elapsed_ms)?;
        self.haptics.pulse(judgment);
        Some(judgment)
    }

    /// Stop the session: freeze the engine, pause playback and rewind.
    /// Safe to call more than once.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.engine.stop();
        self.clock.pause();
        self.clock.seek_start();
    }

    /// Restart the run, possibly on a different difficulty.
    pub fn retry(&mut self, difficulty: Difficulty) {
        self.engine.reset(difficulty);
        self.stopped = false;
        self.clock.seek_start();
        self.clock.play();
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        self.engine.summary()
    }
}
