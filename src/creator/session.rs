use anyhow::{Context, Result};
use chrono::Utc;

use crate::config::settings::{OFFSET_MAX_MS, OFFSET_MIN_MS};
use crate::model::Beatmap;
use crate::submit::BeatmapSubmission;

/// One beatmap recording session against a track.
///
/// Taps are captured relative to the moment playback actually started,
/// not the moment play was requested, so audio spin-up latency never
/// shifts the recording. The calibration offset is kept alongside the
/// taps and applied at playback and export time, never written into the
/// captured timestamps themselves.
#[derive(Debug, Clone)]
pub struct CaptureSession {
    track_id: String,
    beats_ms: Vec<u64>,
    offset_ms: i64,
}

impl CaptureSession {
    pub fn new(track_id: impl Into<String>) -> Self {
        Self {
            track_id: track_id.into(),
            beats_ms: Vec::new(),
            offset_ms: 0,
        }
    }

    pub fn track_id(&self) -> &str {
        &self.track_id
    }

    pub fn beats(&self) -> &[u64] {
        &self.beats_ms
    }

    pub fn len(&self) -> usize {
        self.beats_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats_ms.is_empty()
    }

    pub fn offset_ms(&self) -> i64 {
        self.offset_ms
    }

    /// Record a tap at the given playback position. Returns the stored
    /// timestamp in ms.
    pub fn record_tap(&mut self, elapsed_ms: f64) -> u64 {
        let beat = elapsed_ms.max(0.0).round() as u64;
        self.beats_ms.push(beat);
        log::debug!("recorded beat {} at {}ms", self.beats_ms.len(), beat);
        beat
    }

    /// Set the calibration offset, clamped to the allowed range.
    pub fn set_offset(&mut self, offset_ms: i64) {
        self.offset_ms = offset_ms.clamp(OFFSET_MIN_MS, OFFSET_MAX_MS);
    }

    /// Discard the recording, keeping the offset.
    pub fn clear(&mut self) {
        self.beats_ms.clear();
    }

    /// Remove the most recent tap.
    pub fn undo(&mut self) -> Option<u64> {
        self.beats_ms.pop()
    }

    pub fn to_beatmap(&self) -> Result<Beatmap> {
        Beatmap::new(self.beats_ms.clone()).context("recorded beats are out of order")
    }

    /// Build the submission payload for this recording.
    pub fn export(&self, author: &str, comment: &str) -> Result<BeatmapSubmission> {
        let beatmap = self.to_beatmap()?;
        Ok(BeatmapSubmission::new(
            author,
            &self.track_id,
            &beatmap,
            comment,
            self.offset_ms,
            Utc::now(),
        ))
    }
}
