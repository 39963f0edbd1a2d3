use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::Beatmap;

/// Extra playtime after the last beat when the audio duration is unknown.
const TAIL_MS: u64 = 2000;

/// A playable track: metadata plus its authored beatmap.
///
/// Tracks are defined at configuration time (or produced by the capture
/// loop) and are read-only during gameplay.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    /// Star rating shown in the track list (1-3).
    pub difficulty_rating: u8,
    /// Audio source path or URL, handed to the clock source as-is.
    pub audio_src: String,
    pub beatmap: Beatmap,
    /// Added to every beatmap timestamp to align visuals with audio.
    #[serde(default)]
    pub offset_ms: i64,
}

impl Track {
    /// Load a track definition from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read track file: {}", path.display()))?;
        let track: Track = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse track file: {}", path.display()))?;
        Ok(track)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write track file: {}", path.display()))?;
        Ok(())
    }

    /// Estimated duration used when the clock has not reported one:
    /// last beat plus a short tail.
    pub fn fallback_duration_ms(&self) -> u64 {
        self.beatmap.last_beat().unwrap_or(30_000) + TAIL_MS
    }

    /// Target time of a beat with the track offset applied.
    pub fn beat_target_ms(&self, index: usize) -> Option<f64> {
        self.beatmap
            .beat_at(index)
            .map(|beat| beat as f64 + self.offset_ms as f64)
    }
}

/// Built-in track registry.
///
/// Audio files are expected next to the executable under `assets/`; the
/// beatmaps here are authored data, not inferred from the waveform.
pub fn builtin_tracks() -> Vec<Track> {
    vec![
        Track {
            id: "track1".to_string(),
            name: "Smooth".to_string(),
            difficulty_rating: 1,
            audio_src: "assets/bgm1.wav".to_string(),
            beatmap: Beatmap::new(vec![
                1000, 1500, 2000, 2500, 3000, 3500, 4000, 4500, 5000, 5500, 6000, 6500, 7000,
                7500, 8000, 8500, 9000, 9500, 10000,
            ])
            .expect("builtin beatmap is sorted"),
            offset_ms: 0,
        },
        Track {
            id: "track2".to_string(),
            name: "Festival".to_string(),
            difficulty_rating: 2,
            audio_src: "assets/bgm2.wav".to_string(),
            beatmap: Beatmap::new(vec![
                800, 1200, 1600, 2000, 2200, 2400, 2800, 3200, 3600, 4000, 4200, 4400, 4800,
                5200, 5600, 6000, 6400, 6600, 6800, 7200, 7600, 8000,
            ])
            .expect("builtin beatmap is sorted"),
            offset_ms: -40,
        },
    ]
}
