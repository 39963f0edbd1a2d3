use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::Difficulty;

/// Lower bound for the authoring calibration offset in ms.
pub const OFFSET_MIN_MS: i64 = -500;
/// Upper bound for the authoring calibration offset in ms.
pub const OFFSET_MAX_MS: i64 = 500;

/// User settings persisted between sessions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Last selected difficulty.
    pub difficulty: Difficulty,
    /// Authoring calibration offset in ms, clamped to [-500, 500].
    pub calibration_offset_ms: i64,
    /// Player name used for beatmap submissions.
    pub player_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            calibration_offset_ms: 0,
            player_name: String::new(),
        }
    }
}

impl Settings {
    /// Load settings from disk, falling back to defaults on any error.
    pub fn load() -> Self {
        Self::load_from_file().unwrap_or_default()
    }

    fn load_from_file() -> Result<Self> {
        Self::load_from(&Self::settings_path()?)
    }

    /// Load settings from a specific file. A stored offset outside the
    /// calibration range is clamped on the way in.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut settings: Settings = serde_json::from_str(&content)?;
            settings.calibration_offset_ms = settings
                .calibration_offset_ms
                .clamp(OFFSET_MIN_MS, OFFSET_MAX_MS);
            Ok(settings)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::settings_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn settings_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("dev", "tapline", "tapline") {
            Ok(proj_dirs.config_dir().join("settings.json"))
        } else {
            Ok(PathBuf::from(".tapline-settings.json"))
        }
    }

    /// Set the calibration offset, clamped to the allowed range.
    pub fn set_calibration_offset(&mut self, offset_ms: i64) {
        self.calibration_offset_ms = offset_ms.clamp(OFFSET_MIN_MS, OFFSET_MAX_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_clamped() {
        let mut settings = Settings::default();
        settings.set_calibration_offset(900);
        assert_eq!(settings.calibration_offset_ms, OFFSET_MAX_MS);
        settings.set_calibration_offset(-900);
        assert_eq!(settings.calibration_offset_ms, OFFSET_MIN_MS);
        settings.set_calibration_offset(120);
        assert_eq!(settings.calibration_offset_ms, 120);
    }

    #[test]
    fn settings_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let settings = Settings {
            difficulty: Difficulty::Easy,
            calibration_offset_ms: 80,
            player_name: "ada".to_string(),
        };
        settings.save_to(&path).unwrap();

        let back = Settings::load_from(&path).unwrap();
        assert_eq!(back.difficulty, Difficulty::Easy);
        assert_eq!(back.calibration_offset_ms, 80);
        assert_eq!(back.player_name, "ada");
    }

    #[test]
    fn stored_offset_outside_the_range_is_clamped_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"difficulty":"normal","calibration_offset_ms":9001,"player_name":""}"#,
        )
        .unwrap();

        let back = Settings::load_from(&path).unwrap();
        assert_eq!(back.calibration_offset_ms, OFFSET_MAX_MS);
    }

    #[test]
    fn settings_round_trip_via_json() {
        let settings = Settings {
            difficulty: Difficulty::Hard,
            calibration_offset_ms: -60,
            player_name: "rhythm master".to_string(),
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.difficulty, Difficulty::Hard);
        assert_eq!(back.calibration_offset_ms, -60);
        assert_eq!(back.player_name, "rhythm master");
    }
}
