use serde::{Deserialize, Serialize};

use crate::config::DifficultyProfile;

use super::ScoreBoard;

/// Medal tier awarded on a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    Bronze,
    Silver,
    Gold,
}

impl Medal {
    /// Pick the medal for an accuracy, comparing thresholds descending.
    /// Anything below the bronze threshold still earns bronze on a
    /// successful run, matching the result-screen behavior.
    pub fn for_accuracy(accuracy: f64, profile: &DifficultyProfile) -> Self {
        if accuracy >= profile.medals.gold {
            Medal::Gold
        } else if accuracy >= profile.medals.silver {
            Medal::Silver
        } else {
            Medal::Bronze
        }
    }
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    LivesExhausted,
    TrackEnded,
    Stopped,
}

/// Frozen counters and verdict for a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub score: u32,
    pub max_combo: u32,
    pub perfect_count: u32,
    pub great_count: u32,
    pub good_count: u32,
    pub miss_count: u32,
    pub lives_remaining: u32,
    pub total_notes: u32,
    /// Percentage with one decimal.
    pub accuracy: f64,
    pub success: bool,
    /// Present only on success.
    pub medal: Option<Medal>,
    pub end_reason: EndReason,
}

impl RunSummary {
    pub fn compute(
        board: &ScoreBoard,
        lives_remaining: u32,
        total_notes: u32,
        profile: &DifficultyProfile,
        end_reason: EndReason,
    ) -> Self {
        let accuracy = board.accuracy(total_notes);
        let success = lives_remaining > 0 && accuracy >= profile.success_threshold;
        let medal = success.then(|| Medal::for_accuracy(accuracy, profile));

        Self {
            score: board.score,
            max_combo: board.max_combo,
            perfect_count: board.perfect_count,
            great_count: board.great_count,
            good_count: board.good_count,
            miss_count: board.miss_count,
            lives_remaining,
            total_notes,
            accuracy,
            success,
            medal,
            end_reason,
        }
    }
}
