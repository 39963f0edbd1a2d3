use serde::{Deserialize, Serialize};

/// Base judgment windows in milliseconds, before difficulty scaling.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimingWindows {
    pub perfect: f64,
    pub great: f64,
    pub good: f64,
    /// Outer bound: taps farther than this cannot be attributed to a note.
    pub miss: f64,
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self {
            perfect: 50.0,
            great: 100.0,
            good: 150.0,
            miss: 200.0,
        }
    }
}

/// Score weights per judgment tier plus the per-combo bonus.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Scoring {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub combo_bonus: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            perfect: 100,
            great: 75,
            good: 50,
            combo_bonus: 10,
        }
    }
}

/// Engine pacing constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineTuning {
    /// Notes spawn this many ms before their target time.
    pub lookahead_ms: f64,
    /// Resolved notes stay in the live set this long past the miss window,
    /// so a hit/miss animation can finish.
    pub grace_ms: f64,
    /// Notes closer than this to the previous one reuse its spawn direction.
    pub cluster_ms: f64,
    /// Countdown shown before playback starts.
    pub countdown_seconds: u32,
    /// How long the difficulty info screen stays up.
    pub info_screen_ms: u64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            lookahead_ms: 1500.0,
            grace_ms: 100.0,
            cluster_ms: 300.0,
            countdown_seconds: 3,
            info_screen_ms: 3000,
        }
    }
}

/// Medal thresholds as accuracy percentages.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MedalThresholds {
    pub gold: f64,
    pub silver: f64,
    pub bronze: f64,
}

impl Default for MedalThresholds {
    fn default() -> Self {
        Self {
            gold: 90.0,
            silver: 75.0,
            bronze: 60.0,
        }
    }
}

/// Named difficulty preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// All difficulties in order (easiest to hardest).
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Easy, Difficulty::Normal, Difficulty::Hard]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Hard => "HARD",
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => anyhow::bail!("unknown difficulty '{other}' (easy, normal, hard)"),
        }
    }
}

/// Tunables selected once before a run; immutable while it lasts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// Multiplier applied to every timing window.
    pub timing_multiplier: f64,
    /// Visual hit-zone scale, passed through to the presentation layer.
    pub hit_zone_scale: f64,
    pub lives: u32,
    /// Minimum accuracy percentage for a successful run.
    pub success_threshold: f64,
    pub medals: MedalThresholds,
}

impl DifficultyProfile {
    pub fn preset(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                timing_multiplier: 1.5,
                hit_zone_scale: 1.2,
                lives: 5,
                success_threshold: 50.0,
                medals: MedalThresholds::default(),
            },
            Difficulty::Normal => Self {
                timing_multiplier: 1.0,
                hit_zone_scale: 1.0,
                lives: 3,
                success_threshold: 60.0,
                medals: MedalThresholds::default(),
            },
            Difficulty::Hard => Self {
                timing_multiplier: 0.75,
                hit_zone_scale: 0.8,
                lives: 1,
                success_threshold: 75.0,
                medals: MedalThresholds::default(),
            },
        }
    }
}

/// The full configuration record handed to the engine at run start.
///
/// Every tunable lives here so the logic stays free of magic numbers.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub timing: TimingWindows,
    #[serde(default)]
    pub scoring: Scoring,
    #[serde(default)]
    pub tuning: EngineTuning,
}

impl GameConfig {
    pub fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        DifficultyProfile::preset(difficulty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_windows_match_base_constants() {
        let timing = TimingWindows::default();
        assert_eq!(timing.perfect, 50.0);
        assert_eq!(timing.great, 100.0);
        assert_eq!(timing.good, 150.0);
        assert_eq!(timing.miss, 200.0);
    }

    #[test]
    fn presets_follow_difficulty_order() {
        let easy = DifficultyProfile::preset(Difficulty::Easy);
        let normal = DifficultyProfile::preset(Difficulty::Normal);
        let hard = DifficultyProfile::preset(Difficulty::Hard);

        assert!(easy.timing_multiplier > normal.timing_multiplier);
        assert!(normal.timing_multiplier > hard.timing_multiplier);
        assert!(easy.lives > normal.lives);
        assert!(normal.lives > hard.lives);
        assert!(easy.success_threshold < hard.success_threshold);
    }

    #[test]
    fn config_deserializes_from_empty_object() {
        let config: GameConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.tuning.lookahead_ms, 1500.0);
        assert_eq!(config.scoring.combo_bonus, 10);
    }
}
