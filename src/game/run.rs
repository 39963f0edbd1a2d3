use thiserror::Error;

use crate::config::{Difficulty, DifficultyProfile, GameConfig};
use crate::model::Track;

use super::field::NoteField;
use super::judge::{JudgeWindow, TimingDirection};
use super::note::BeatNote;
use super::result::{EndReason, RunSummary};
use super::score::ScoreBoard;
use super::Judgment;

#[derive(Debug, Error)]
pub enum StartError {
    #[error("track '{0}' has an empty beatmap")]
    EmptyBeatmap(String),
}

/// What a single tick did. Handed to the caller so the presentation layer
/// can react without reaching into the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickReport {
    pub spawned: usize,
    pub timed_out: u32,
    pub finished: bool,
    /// Track progress in percent, when a duration was supplied.
    pub progress: Option<f64>,
}

enum Phase {
    Running,
    Finished(RunSummary),
}

/// The per-run engine: owns the live-note set, the score board and the
/// remaining lives, and advances them from clock ticks and tap events.
///
/// The engine never reads wall-clock time; `elapsed_ms` always comes from
/// the caller's clock source, so the run stays anchored to real playback.
pub struct RunEngine {
    config: GameConfig,
    profile: DifficultyProfile,
    window: JudgeWindow,
    track: Track,
    field: NoteField,
    board: ScoreBoard,
    lives: u32,
    elapsed_ms: f64,
    phase: Phase,
    last_judgment: Option<Judgment>,
    last_timing: Option<TimingDirection>,
}

impl RunEngine {
    pub fn new(track: Track, config: GameConfig, difficulty: Difficulty) -> Result<Self, StartError> {
        if track.beatmap.is_empty() {
            return Err(StartError::EmptyBeatmap(track.id.clone()));
        }
        let profile = config.profile(difficulty);
        let window = JudgeWindow::for_profile(config.timing, &profile);
        Ok(Self {
            config,
            profile,
            window,
            track,
            field: NoteField::new(),
            board: ScoreBoard::new(),
            lives: profile.lives,
            elapsed_ms: 0.0,
            phase: Phase::Running,
            last_judgment: None,
            last_timing: None,
        })
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn score(&self) -> &ScoreBoard {
        &self.board
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn live_notes(&self) -> &[BeatNote] {
        self.field.live()
    }

    pub fn last_judgment(&self) -> Option<Judgment> {
        self.last_judgment
    }

    /// Whether the last judged tap was early or late, for the display
    /// layer's fast/slow feedback. Timeouts report as late.
    pub fn last_timing(&self) -> Option<TimingDirection> {
        self.last_timing
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, Phase::Finished(_))
    }

    pub fn summary(&self) -> Option<&RunSummary> {
        match &self.phase {
            Phase::Running => None,
            Phase::Finished(summary) => Some(summary),
        }
    }

    /// Advance the run to `elapsed_ms`.
    ///
    /// Within one tick the order is fixed: spawn, then age out unresolved
    /// notes, then evict resolved ones, then report progress. A note that
    /// both times out and qualifies for eviction in the same tick is
    /// counted as missed before it is removed.
    pub fn tick(&mut self, elapsed_ms: f64, duration_ms: Option<f64>) -> TickReport {
        if self.is_finished() {
            return TickReport {
                finished: true,
                ..TickReport::default()
            };
        }
        self.elapsed_ms = elapsed_ms;

        let spawned = self.field.spawn(&self.track, elapsed_ms, &self.config.tuning);

        let timed_out = self.field.collect_timeouts(elapsed_ms, &self.window);
        for _ in 0..timed_out {
            self.board.apply(Judgment::Miss, &self.config.scoring);
            self.lives = self.lives.saturating_sub(1);
            self.last_judgment = Some(Judgment::Miss);
            self.last_timing = Some(TimingDirection::Late);
        }
        if timed_out > 0 {
            log::debug!("{} note(s) timed out, lives {}", timed_out, self.lives);
        }

        self.field.evict(elapsed_ms, &self.window, &self.config.tuning);

        if self.lives == 0 {
            self.finish(EndReason::LivesExhausted);
        }

        let duration = duration_ms.unwrap_or_else(|| self.track.fallback_duration_ms() as f64);
        let progress = (duration > 0.0).then(|| (elapsed_ms / duration * 100.0).min(100.0));

        TickReport {
            spawned,
            timed_out,
            finished: self.is_finished(),
            progress,
        }
    }

    /// Classify a tap at `elapsed_ms` against the nearest unresolved note.
    ///
    /// Returns `None` when no unresolved note lies within the miss window;
    /// such taps change no state. Otherwise the note is resolved exactly
    /// once with the returned judgment.
    pub fn tap(&mut self, elapsed_ms: f64) -> Option<Judgment> {
        if self.is_finished() {
            return None;
        }
        self.elapsed_ms = elapsed_ms;

        let (live_index, distance) = self.field.closest_pending(elapsed_ms)?;
        let judgment = self.window.classify(distance)?;

        let note = self.field.note_mut(live_index)?;
        let timing_diff = note.target_time_ms - elapsed_ms;
        if !note.resolve(judgment, elapsed_ms) {
            return None;
        }
        log::debug!(
            "tap at {:.0}ms hit note {} ({:.0}ms off): {:?}",
            elapsed_ms,
            note.index,
            distance,
            judgment
        );

        self.board.apply(judgment, &self.config.scoring);
        self.last_judgment = Some(judgment);
        self.last_timing = Some(TimingDirection::from_timing_diff(timing_diff));
        if judgment == Judgment::Miss {
            self.lives = self.lives.saturating_sub(1);
            if self.lives == 0 {
                self.finish(EndReason::LivesExhausted);
            }
        }
        Some(judgment)
    }

    /// Playback ended: freeze counters and compute the verdict.
    pub fn notify_track_ended(&mut self) {
        if !self.is_finished() {
            self.finish(EndReason::TrackEnded);
        }
    }

    /// Manual stop. Idempotent: a second call leaves the summary as-is.
    pub fn stop(&mut self) {
        if !self.is_finished() {
            self.finish(EndReason::Stopped);
        }
    }

    /// Reset for a retry. Lives are re-read from the difficulty profile,
    /// which may differ from the previous run's.
    pub fn reset(&mut self, difficulty: Difficulty) {
        self.profile = self.config.profile(difficulty);
        self.window = JudgeWindow::for_profile(self.config.timing, &self.profile);
        self.field.reset();
        self.board.reset();
        self.lives = self.profile.lives;
        self.elapsed_ms = 0.0;
        self.phase = Phase::Running;
        self.last_judgment = None;
        self.last_timing = None;
    }

    fn finish(&mut self, reason: EndReason) {
        let summary = RunSummary::compute(
            &self.board,
            self.lives,
            self.track.beatmap.len() as u32,
            &self.profile,
            reason,
        );
        log::info!(
            "run finished ({:?}): score {}, accuracy {:.1}%, success {}",
            reason,
            summary.score,
            summary.accuracy,
            summary.success
        );
        self.phase = Phase::Finished(summary);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Beatmap;

    fn track(beats: Vec<u64>) -> Track {
        Track {
            id: "test".to_string(),
            name: "Test".to_string(),
            difficulty_rating: 1,
            audio_src: String::new(),
            beatmap: Beatmap::new(beats).unwrap(),
            offset_ms: 0,
        }
    }

    fn engine(beats: Vec<u64>, difficulty: Difficulty) -> RunEngine {
        RunEngine::new(track(beats), GameConfig::default(), difficulty).unwrap()
    }

    #[test]
    fn empty_beatmap_is_rejected() {
        let err = RunEngine::new(track(vec![]), GameConfig::default(), Difficulty::Normal)
            .err()
            .unwrap();
        assert!(matches!(err, StartError::EmptyBeatmap(_)));
    }

    #[test]
    fn easy_scenario_from_the_field_manual() {
        // Easy: multiplier 1.5, lives 5. Beatmap [1000, 1050].
        let mut engine = engine(vec![1000, 1050], Difficulty::Easy);
        engine.tick(900.0, None);

        // Tap at 1005: distance 5 <= 75 (perfect window) -> perfect.
        assert_eq!(engine.tap(1005.0), Some(Judgment::Perfect));
        assert_eq!(engine.score().combo, 1);
        assert_eq!(engine.score().score, 110);

        // Note 2 times out once elapsed passes 1050 + 200*1.5 = 1350.
        let report = engine.tick(1351.0, None);
        assert_eq!(report.timed_out, 1);
        assert_eq!(engine.lives(), 4);
        assert_eq!(engine.score().combo, 0);

        // A later tap finds nothing pending.
        assert_eq!(engine.tap(1700.0), None);
    }

    #[test]
    fn lives_exhausted_terminates_the_run() {
        // Normal has 3 lives; three timeouts end the run unsuccessfully.
        let mut engine = engine(vec![1000, 1100, 1200], Difficulty::Normal);
        engine.tick(900.0, None);
        let report = engine.tick(1500.0, None);
        assert_eq!(report.timed_out, 3);
        assert!(report.finished);

        let summary = engine.summary().unwrap();
        assert_eq!(summary.end_reason, EndReason::LivesExhausted);
        assert!(!summary.success);
        assert_eq!(summary.lives_remaining, 0);
    }

    #[test]
    fn manual_late_tap_counts_as_miss_with_lives_cost() {
        let mut engine = engine(vec![1000], Difficulty::Normal);
        engine.tick(900.0, None);

        // Distance 180 lands between the good (150) and miss (200) windows.
        assert_eq!(engine.tap(1180.0), Some(Judgment::Miss));
        assert_eq!(engine.lives(), 2);
        assert_eq!(engine.score().miss_count, 1);

        // The note is resolved; no second judgment can touch it.
        assert_eq!(engine.tap(1181.0), None);
    }

    #[test]
    fn tap_direction_is_reported_for_display() {
        use super::super::TimingDirection;

        let mut engine = engine(vec![1000, 3000, 5000], Difficulty::Normal);
        engine.tick(900.0, None);

        // 40ms before the target: early.
        assert_eq!(engine.tap(960.0), Some(Judgment::Perfect));
        assert_eq!(engine.last_timing(), Some(TimingDirection::Early));

        // 80ms past the next target: late.
        engine.tick(2900.0, None);
        assert_eq!(engine.tap(3080.0), Some(Judgment::Great));
        assert_eq!(engine.last_timing(), Some(TimingDirection::Late));

        // A timeout counts as late feedback too.
        engine.tick(5300.0, None);
        assert_eq!(engine.last_judgment(), Some(Judgment::Miss));
        assert_eq!(engine.last_timing(), Some(TimingDirection::Late));

        engine.reset(Difficulty::Normal);
        assert_eq!(engine.last_timing(), None);
    }

    #[test]
    fn track_end_freezes_the_run() {
        let mut engine = engine(vec![1000], Difficulty::Normal);
        engine.tick(900.0, None);
        assert_eq!(engine.tap(1000.0), Some(Judgment::Perfect));

        engine.notify_track_ended();
        let summary = engine.summary().unwrap();
        assert_eq!(summary.end_reason, EndReason::TrackEnded);
        assert_eq!(summary.accuracy, 100.0);
        assert!(summary.success);

        // Frozen: further input is ignored.
        assert_eq!(engine.tap(1005.0), None);
        let report = engine.tick(2000.0, None);
        assert!(report.finished);
        assert_eq!(report.spawned, 0);
    }

    #[test]
    fn stop_is_idempotent() {
        let mut engine = engine(vec![1000], Difficulty::Normal);
        engine.tick(500.0, None);
        engine.stop();
        let first = engine.summary().unwrap().clone();
        engine.stop();
        let second = engine.summary().unwrap();
        assert_eq!(first.end_reason, second.end_reason);
        assert_eq!(first.score, second.score);
    }

    #[test]
    fn reset_rereads_lives_from_the_new_profile() {
        let mut engine = engine(vec![1000, 2000], Difficulty::Normal);
        engine.tick(1500.0, None);
        assert_eq!(engine.lives(), 2);

        engine.reset(Difficulty::Easy);
        assert_eq!(engine.lives(), 5);
        assert_eq!(engine.score().judged_count(), 0);
        assert!(engine.live_notes().is_empty());
        assert!(!engine.is_finished());
    }

    #[test]
    fn score_is_non_decreasing_across_a_run() {
        let mut engine = engine(vec![500, 1000, 1500, 2000], Difficulty::Normal);
        let taps = [500.0, 1040.0, 1660.0];
        let mut last_score = 0;
        let mut t = 0.0;
        let mut tap_iter = taps.iter().peekable();
        while t < 3000.0 {
            engine.tick(t, None);
            if let Some(&&tap_at) = tap_iter.peek() {
                if tap_at <= t {
                    engine.tap(tap_at);
                    tap_iter.next();
                }
            }
            assert!(engine.score().score >= last_score);
            last_score = engine.score().score;
            t += 16.0;
        }
    }
}
