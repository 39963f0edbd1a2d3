use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::EngineTuning;
use crate::model::Track;

use super::judge::JudgeWindow;
use super::note::BeatNote;

/// Owns the live-note set and drives its lifecycle: spawning from the
/// beatmap inside the lookahead window, aging unresolved notes into
/// misses, and evicting resolved notes once their grace window passes.
#[derive(Debug)]
pub struct NoteField {
    live: Vec<BeatNote>,
    /// Next beatmap index to spawn. Only ever increases until reset.
    next_unspawned: usize,
    last_spawn_target_ms: Option<f64>,
    last_spawn_angle_deg: f32,
    rng: SmallRng,
}

impl NoteField {
    pub fn new() -> Self {
        Self {
            live: Vec::new(),
            next_unspawned: 0,
            last_spawn_target_ms: None,
            last_spawn_angle_deg: 0.0,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn reset(&mut self) {
        self.live.clear();
        self.next_unspawned = 0;
        self.last_spawn_target_ms = None;
        self.last_spawn_angle_deg = 0.0;
    }

    pub fn live(&self) -> &[BeatNote] {
        &self.live
    }

    pub fn note_mut(&mut self, live_index: usize) -> Option<&mut BeatNote> {
        self.live.get_mut(live_index)
    }

    pub fn next_unspawned(&self) -> usize {
        self.next_unspawned
    }

    /// Spawn every beat whose target time has entered the lookahead
    /// window. Closely spaced beats can spawn several notes in one tick.
    /// Returns the number of notes spawned.
    pub fn spawn(&mut self, track: &Track, elapsed_ms: f64, tuning: &EngineTuning) -> usize {
        let mut spawned = 0;
        while let Some(target_ms) = track.beat_target_ms(self.next_unspawned) {
            if target_ms - elapsed_ms > tuning.lookahead_ms {
                break;
            }
            let angle = self.spawn_angle(target_ms, tuning.cluster_ms);
            self.live
                .push(BeatNote::new(self.next_unspawned, target_ms, angle));
            self.next_unspawned += 1;
            spawned += 1;
        }
        if spawned > 0 {
            log::debug!(
                "spawned {} note(s), next index {}",
                spawned,
                self.next_unspawned
            );
        }
        spawned
    }

    /// Notes inside a rapid cluster approach from the same direction;
    /// otherwise pick a fresh pseudo-random one.
    fn spawn_angle(&mut self, target_ms: f64, cluster_ms: f64) -> f32 {
        let angle = match self.last_spawn_target_ms {
            Some(previous) if target_ms - previous < cluster_ms => self.last_spawn_angle_deg,
            _ => self.rng.gen_range(0.0..360.0),
        };
        self.last_spawn_target_ms = Some(target_ms);
        self.last_spawn_angle_deg = angle;
        angle
    }

    /// Resolve every unresolved note that aged past the miss window.
    /// Returns how many timed out; each is counted as a miss exactly once.
    pub fn collect_timeouts(&mut self, elapsed_ms: f64, window: &JudgeWindow) -> u32 {
        let mut missed = 0;
        for note in &mut self.live {
            if !note.is_pending() {
                continue;
            }
            let timing_diff = note.target_time_ms - elapsed_ms;
            if window.is_timed_out(timing_diff)
                && note.resolve(super::Judgment::Miss, elapsed_ms)
            {
                missed += 1;
            }
        }
        missed
    }

    /// Drop resolved notes once their grace window has passed. Unresolved
    /// notes are never evicted; they go through [`collect_timeouts`] first.
    ///
    /// [`collect_timeouts`]: NoteField::collect_timeouts
    pub fn evict(&mut self, elapsed_ms: f64, window: &JudgeWindow, tuning: &EngineTuning) {
        let horizon = window.miss + tuning.grace_ms;
        self.live
            .retain(|note| note.is_pending() || note.target_time_ms - elapsed_ms > -horizon);
    }

    /// The unresolved live note closest to `elapsed_ms`.
    /// Returns the index into the live set and the absolute distance in ms;
    /// ties resolve to the earliest note.
    pub fn closest_pending(&self, elapsed_ms: f64) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (i, note) in self.live.iter().enumerate() {
            if !note.is_pending() {
                continue;
            }
            let distance = (note.target_time_ms - elapsed_ms).abs();
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((i, distance));
            }
        }
        best
    }
}

impl Default for NoteField {
    fn default() -> Self {
        Self::new()
    }
}
