use std::time::Instant;

/// Events surfaced by a clock between polls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockEvent {
    /// Playback actually started; elapsed time is measured from here.
    Started,
    /// The source learned its real duration, in ms.
    MetadataLoaded(f64),
    /// Playback reached the end of the source.
    Ended,
}

/// A playback position source.
///
/// The run engine never reads wall-clock time directly; everything is
/// driven from `position_ms` of whichever clock backs the session. The
/// position is `None` until [`ClockEvent::Started`] has fired, so taps
/// before playback begins have nothing to anchor to.
pub trait ClockSource {
    fn play(&mut self);
    fn pause(&mut self);
    fn seek_start(&mut self);
    /// Elapsed playback time in ms, or `None` if playback never started.
    fn position_ms(&mut self) -> Option<f64>;
    fn duration_ms(&self) -> Option<f64>;
    /// Drain events produced since the last poll.
    fn poll(&mut self) -> Vec<ClockEvent>;
}

impl<T: ClockSource + ?Sized> ClockSource for Box<T> {
    fn play(&mut self) {
        (**self).play()
    }
    fn pause(&mut self) {
        (**self).pause()
    }
    fn seek_start(&mut self) {
        (**self).seek_start()
    }
    fn position_ms(&mut self) -> Option<f64> {
        (**self).position_ms()
    }
    fn duration_ms(&self) -> Option<f64> {
        (**self).duration_ms()
    }
    fn poll(&mut self) -> Vec<ClockEvent> {
        (**self).poll()
    }
}

/// A clock advanced explicitly by the caller. Used in tests, where each
/// step is a deterministic position.
#[derive(Debug, Default)]
pub struct ManualClock {
    position_ms: Option<f64>,
    duration_ms: Option<f64>,
    playing: bool,
    pending: Vec<ClockEvent>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_duration(duration_ms: f64) -> Self {
        Self {
            duration_ms: Some(duration_ms),
            pending: vec![ClockEvent::MetadataLoaded(duration_ms)],
            ..Self::default()
        }
    }

    /// Move the clock to an absolute position. Emits `Ended` when the
    /// position crosses the duration.
    pub fn set_position(&mut self, position_ms: f64) {
        self.position_ms = Some(position_ms);
        if let Some(duration) = self.duration_ms {
            if position_ms >= duration && self.playing {
                self.playing = false;
                self.pending.push(ClockEvent::Ended);
            }
        }
    }
}

impl ClockSource for ManualClock {
    fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            if self.position_ms.is_none() {
                self.position_ms = Some(0.0);
            }
            self.pending.push(ClockEvent::Started);
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek_start(&mut self) {
        self.position_ms = self.position_ms.map(|_| 0.0);
    }

    fn position_ms(&mut self) -> Option<f64> {
        self.position_ms
    }

    fn duration_ms(&self) -> Option<f64> {
        self.duration_ms
    }

    fn poll(&mut self) -> Vec<ClockEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// A wall-time clock for silent sessions, used when audio output is
/// unavailable. Runs against a fixed fallback duration.
#[derive(Debug)]
pub struct WallClock {
    duration_ms: f64,
    started: bool,
    started_at: Option<Instant>,
    /// Accumulated elapsed time from earlier play/pause spans, in ms.
    banked_ms: f64,
    pending: Vec<ClockEvent>,
    ended: bool,
}

impl WallClock {
    pub fn new(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            started: false,
            started_at: None,
            banked_ms: 0.0,
            pending: vec![ClockEvent::MetadataLoaded(duration_ms)],
            ended: false,
        }
    }

    fn elapsed(&self) -> Option<f64> {
        if !self.started {
            return None;
        }
        match self.started_at {
            Some(at) => Some(self.banked_ms + at.elapsed().as_secs_f64() * 1000.0),
            None => Some(self.banked_ms),
        }
    }
}

impl ClockSource for WallClock {
    fn play(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
            self.ended = false;
            if !self.started {
                self.started = true;
                self.pending.push(ClockEvent::Started);
            }
        }
    }

    fn pause(&mut self) {
        if let Some(at) = self.started_at.take() {
            self.banked_ms += at.elapsed().as_secs_f64() * 1000.0;
        }
    }

    fn seek_start(&mut self) {
        self.banked_ms = 0.0;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn position_ms(&mut self) -> Option<f64> {
        self.elapsed().map(|ms| ms.min(self.duration_ms))
    }

    fn duration_ms(&self) -> Option<f64> {
        Some(self.duration_ms)
    }

    fn poll(&mut self) -> Vec<ClockEvent> {
        if !self.ended
            && self
                .elapsed()
                .is_some_and(|elapsed| elapsed >= self.duration_ms)
        {
            self.ended = true;
            self.pause();
            self.banked_ms = self.duration_ms;
            self.pending.push(ClockEvent::Ended);
        }
        std::mem::take(&mut self.pending)
    }
}
