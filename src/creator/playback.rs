use crate::audio::{ClickSink, ClockEvent, ClockSource};

use super::session::CaptureSession;

/// Cursor over a recorded beatmap during test playback.
///
/// Each update fires every beat whose adjusted time has been reached and
/// advances past it, so a beat clicks exactly once per playback. The
/// calibration offset shifts when the click fires, not the stored beats.
#[derive(Debug, Default)]
pub struct TestPlayback {
    cursor: usize,
}

impl TestPlayback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of clicks due at `elapsed_ms`. A coarse poll interval can
    /// make several beats due at once.
    pub fn due_clicks(&mut self, beats_ms: &[u64], offset_ms: i64, elapsed_ms: f64) -> usize {
        let mut due = 0;
        while let Some(&beat) = beats_ms.get(self.cursor) {
            if elapsed_ms < beat as f64 + offset_ms as f64 {
                break;
            }
            self.cursor += 1;
            due += 1;
        }
        due
    }
}

/// Drives one test-playback pass of a recording: polls the clock and
/// sounds the click for every beat that came due, offset applied.
pub struct PlaybackSession<C: ClockSource, S: ClickSink> {
    clock: C,
    sink: S,
    cursor: TestPlayback,
    beats_ms: Vec<u64>,
    offset_ms: i64,
    finished: bool,
}

impl<C: ClockSource, S: ClickSink> PlaybackSession<C, S> {
    pub fn start(session: &CaptureSession, mut clock: C, sink: S) -> Self {
        clock.play();
        Self {
            clock,
            sink,
            cursor: TestPlayback::new(),
            beats_ms: session.beats().to_vec(),
            offset_ms: session.offset_ms(),
            finished: false,
        }
    }

    pub fn clock(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drive one frame. Returns true once playback has ended.
    pub fn update(&mut self) -> bool {
        for event in self.clock.poll() {
            if event == ClockEvent::Ended {
                self.finished = true;
            }
        }
        if let Some(elapsed_ms) = self.clock.position_ms() {
            let due = self
                .cursor
                .due_clicks(&self.beats_ms, self.offset_ms, elapsed_ms);
            for _ in 0..due {
                self.sink.click();
            }
        }
        self.finished
    }

    /// Stop and rewind so the pass can be replayed from the top.
    pub fn stop(&mut self) {
        self.clock.pause();
        self.clock.seek_start();
        self.cursor.reset();
        self.finished = false;
    }
}
