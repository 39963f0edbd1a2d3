// Configuration: engine tunables, difficulty presets, persisted settings.

pub mod settings;
pub mod tuning;

pub use settings::{OFFSET_MAX_MS, OFFSET_MIN_MS, Settings};
pub use tuning::{
    Difficulty, DifficultyProfile, EngineTuning, GameConfig, MedalThresholds, Scoring,
    TimingWindows,
};
